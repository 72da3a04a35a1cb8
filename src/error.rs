//! Error types for kitup operations.
//!
//! This module defines [`KitupError`], the error type used for failures that
//! stop a provisioning run before it can produce a meaningful report, and a
//! [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Per-capability problems (a missing tool, a wrong version, an install that
//!   never succeeded) are *not* errors. They are recorded on the run report.
//! - `KitupError` is reserved for configuration mistakes, registry
//!   misconfiguration (cycles) and unsupported hosts, all of which abort
//!   before any installation is attempted.
//! - Use `anyhow::Error` (via `KitupError::Other`) for unexpected errors.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for kitup operations.
#[derive(Debug, Error)]
pub enum KitupError {
    /// Configuration file not found at expected location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid configuration structure or values.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// Capability prerequisite cycle detected.
    #[error("Circular dependency detected: {cycle}")]
    CircularDependency { cycle: String },

    /// The host cannot be provisioned at all.
    #[error("Unsupported platform: {message}")]
    UnsupportedPlatform { message: String },

    /// Shell command could not be run or failed.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for kitup operations.
pub type Result<T> = std::result::Result<T, KitupError>;
