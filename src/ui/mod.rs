//! User interface components.
//!
//! This module provides:
//! - [`UserInterface`] trait for UI abstraction
//! - [`TerminalUI`] for interactive terminal usage
//! - [`NonInteractiveUI`] for CI/headless environments
//! - [`MockUI`] capturing everything for tests
//!
//! # Example
//!
//! ```
//! use kitup::ui::{create_ui, OutputMode};
//!
//! let mut ui = create_ui(false, OutputMode::Quiet, false);
//! ui.show_header("kitup");
//! ui.success("environment ready");
//! ```

pub mod mock;
pub mod non_interactive;
pub mod output;
pub mod prompts;
pub mod spinner;
pub mod terminal;
pub mod theme;

pub use mock::{MockSpinner, MockUI};
pub use non_interactive::NonInteractiveUI;
pub use output::OutputMode;
pub use prompts::confirm;
pub use spinner::ProgressSpinner;
pub use terminal::{create_ui, TerminalUI};
pub use theme::{should_use_colors, KitupTheme};

use crate::error::Result;

/// Trait for user interface interactions.
///
/// This trait allows mocking the UI in tests.
pub trait UserInterface {
    /// Get the current output mode.
    fn output_mode(&self) -> OutputMode;

    /// Display a plain message.
    fn message(&mut self, msg: &str);

    /// Display an informational line (ℹ).
    fn info(&mut self, msg: &str);

    /// Display a success line (✓).
    fn success(&mut self, msg: &str);

    /// Display a warning line (⚠).
    fn warning(&mut self, msg: &str);

    /// Display an error line (✗). Shown in every output mode.
    fn error(&mut self, msg: &str);

    /// Display an indented hint beneath the previous line.
    fn hint(&mut self, msg: &str);

    /// Ask a yes/no question. `key` identifies the question for scripting.
    fn confirm(&mut self, key: &str, question: &str, default: bool) -> Result<bool>;

    /// Start a spinner for an operation.
    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle>;

    /// Show a header/banner.
    fn show_header(&mut self, title: &str);

    /// Check if running in interactive mode.
    fn is_interactive(&self) -> bool;
}

/// Handle for controlling a spinner.
pub trait SpinnerHandle {
    /// Update the spinner message.
    fn set_message(&mut self, msg: &str);

    /// Finish with an informational line.
    fn finish_info(&mut self, msg: &str);

    /// Finish with a success line.
    fn finish_success(&mut self, msg: &str);

    /// Finish with a warning line.
    fn finish_warning(&mut self, msg: &str);

    /// Finish with an error line.
    fn finish_error(&mut self, msg: &str);
}
