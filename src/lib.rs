//! kitup - Declarative, idempotent development environment provisioning.
//!
//! kitup detects the host platform, orders a graph of *capabilities* by
//! their prerequisites, installs or repairs each one that is missing,
//! re-probes everything and reports leveled diagnostics with an exit code.
//! Running it twice on a provisioned machine changes nothing.
//!
//! # Modules
//!
//! - [`backends`] - Package manager, service runtime and shell profile
//! - [`capabilities`] - Capability model, probe, registry and installer
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Configuration loading, parsing, and validation
//! - [`error`] - Error types and result aliases
//! - [`report`] - Provisioning results, sealed reports and rendering
//! - [`runner`] - Provisioning engine, verifier, preflight and cancellation
//! - [`shell`] - Shell command execution and path helpers
//! - [`ui`] - Prompts, spinners, and terminal output
//!
//! # Example
//!
//! ```
//! use kitup::capabilities::{Action, Capability, CapabilityRegistry, Detect};
//!
//! let file = |name: &str| Detect::File { path: format!("{}.ok", name) };
//! let registry = CapabilityRegistry::new(vec![
//!     Capability::new("app", file("app"), Action::Manual).requires(["db"]),
//!     Capability::new("db", file("db"), Action::Manual),
//! ])
//! .unwrap();
//!
//! let order: Vec<_> = registry
//!     .resolve_order()
//!     .unwrap()
//!     .iter()
//!     .map(|c| c.name.as_str())
//!     .collect();
//! assert_eq!(order, vec!["db", "app"]);
//! ```

pub mod backends;
pub mod capabilities;
pub mod cli;
pub mod config;
pub mod error;
pub mod report;
pub mod runner;
pub mod shell;
pub mod ui;

pub use error::{KitupError, Result};
