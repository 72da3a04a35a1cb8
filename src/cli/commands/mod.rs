//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! # Architecture
//!
//! Commands are dispatched via [`CommandDispatcher`], which routes CLI
//! subcommands to their implementations. Config loading, platform
//! detection and registry construction are shared in [`setup`].

pub mod check;
pub mod completions;
pub mod dispatcher;
pub mod list;
pub mod run;
pub mod setup;

pub use dispatcher::{Command, CommandDispatcher, CommandResult, FATAL_EXIT_CODE};
