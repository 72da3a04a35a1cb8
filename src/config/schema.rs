//! Configuration schema definitions for kitup.
//!
//! This module contains the struct definitions that map to
//! the `.kitup/config.yml` file format.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::capabilities::{Capability, RetryPolicy};

/// Root configuration structure for `.kitup/config.yml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KitupConfig {
    /// Global settings
    pub settings: Settings,

    /// Project capabilities. A name matching a built-in replaces it in
    /// place; any other name is appended after the built-ins.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub capabilities: Vec<Capability>,
}

/// Global settings that apply to every run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Include the built-in developer stack
    #[serde(default = "default_true")]
    pub builtin: bool,

    /// Shell profile to write exports to (defaults by login shell)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<PathBuf>,

    /// Provision hosts that are not macOS
    #[serde(default, skip_serializing_if = "is_false")]
    pub allow_unsupported_os: bool,

    /// Default retry policy for install actions
    pub retry: RetryPolicy,

    /// Timeout for HTTP probes, in seconds
    #[serde(default = "default_http_timeout")]
    pub http_timeout_secs: u64,

    /// Run host diagnostics before provisioning
    #[serde(default = "default_true")]
    pub preflight: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            builtin: true,
            profile: None,
            allow_unsupported_os: false,
            retry: RetryPolicy::default(),
            http_timeout_secs: default_http_timeout(),
            preflight: true,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_http_timeout() -> u64 {
    5
}

fn is_false(b: &bool) -> bool {
    !*b
}
