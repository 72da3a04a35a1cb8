//! Non-interactive UI for CI/headless environments.

use crate::error::Result;

use super::{OutputMode, SpinnerHandle, UserInterface};

/// Severity marker of a printed line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Marker {
    Info,
    Success,
    Warning,
    Error,
}

impl Marker {
    fn symbol(self) -> &'static str {
        match self {
            Marker::Info => "ℹ",
            Marker::Success => "✓",
            Marker::Warning => "⚠",
            Marker::Error => "✗",
        }
    }

    /// Errors print even in silent mode.
    fn visible(self, mode: OutputMode) -> bool {
        self == Marker::Error || mode.shows_status()
    }

    fn to_stderr(self) -> bool {
        matches!(self, Marker::Warning | Marker::Error)
    }
}

fn print_marked(mode: OutputMode, marker: Marker, msg: &str) {
    if !marker.visible(mode) {
        return;
    }
    if marker.to_stderr() {
        eprintln!("{} {}", marker.symbol(), msg);
    } else {
        println!("{} {}", marker.symbol(), msg);
    }
}

/// UI implementation for non-interactive mode.
///
/// Writes plain lines with severity markers: status to stdout, warnings
/// and errors to stderr. Confirmations always take their default.
pub struct NonInteractiveUI {
    mode: OutputMode,
}

impl NonInteractiveUI {
    pub fn new(mode: OutputMode) -> Self {
        Self { mode }
    }
}

impl UserInterface for NonInteractiveUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("{}", msg);
        }
    }

    fn info(&mut self, msg: &str) {
        print_marked(self.mode, Marker::Info, msg);
    }

    fn success(&mut self, msg: &str) {
        print_marked(self.mode, Marker::Success, msg);
    }

    fn warning(&mut self, msg: &str) {
        print_marked(self.mode, Marker::Warning, msg);
    }

    fn error(&mut self, msg: &str) {
        print_marked(self.mode, Marker::Error, msg);
    }

    fn hint(&mut self, msg: &str) {
        if self.mode.shows_status() {
            for line in msg.lines() {
                println!("    {}", line);
            }
        }
    }

    fn confirm(&mut self, key: &str, _question: &str, default: bool) -> Result<bool> {
        tracing::debug!("Non-interactive: using default {} for '{}'", default, key);
        Ok(default)
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        if self.mode.shows_progress() {
            println!("  {}", message);
        }
        Box::new(LineSpinner { mode: self.mode })
    }

    fn show_header(&mut self, title: &str) {
        if self.mode.shows_status() {
            println!("\n{}\n", title);
        }
    }

    fn is_interactive(&self) -> bool {
        false
    }
}

/// Spinner stand-in that prints the final line only.
struct LineSpinner {
    mode: OutputMode,
}

impl SpinnerHandle for LineSpinner {
    fn set_message(&mut self, msg: &str) {
        if self.mode.shows_detail() {
            println!("  {}", msg);
        }
    }

    fn finish_info(&mut self, msg: &str) {
        print_marked(self.mode, Marker::Info, msg);
    }

    fn finish_success(&mut self, msg: &str) {
        print_marked(self.mode, Marker::Success, msg);
    }

    fn finish_warning(&mut self, msg: &str) {
        print_marked(self.mode, Marker::Warning, msg);
    }

    fn finish_error(&mut self, msg: &str) {
        print_marked(self.mode, Marker::Error, msg);
    }
}
