//! Non-fatal host diagnostics shown before provisioning.
//!
//! Nothing here stops a run. Each check queries the host through a command
//! and yields at most one finding; a query that fails or produces
//! unparseable output is skipped silently.

use serde::Serialize;

use crate::capabilities::platform::{OsFamily, Platform};

/// Oldest macOS major version considered supported.
pub const MIN_MACOS_MAJOR: u32 = 12;

/// Physical memory below which a warning is shown.
pub const MIN_MEMORY_BYTES: u64 = 8 * 1024 * 1024 * 1024;

/// How serious a preflight finding is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingLevel {
    Info,
    Warning,
}

/// One preflight finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub level: FindingLevel,
    pub message: String,
}

impl Finding {
    fn info(message: String) -> Self {
        Self {
            level: FindingLevel::Info,
            message,
        }
    }

    fn warning(message: String) -> Self {
        Self {
            level: FindingLevel::Warning,
            message,
        }
    }
}

/// Run every preflight check. `query` runs a command and returns its stdout
/// when it succeeds.
pub fn run_checks(platform: &Platform, query: &dyn Fn(&str) -> Option<String>) -> Vec<Finding> {
    let mut findings = Vec::new();

    if platform.os_family == OsFamily::MacOs {
        if let Some(finding) = query("sw_vers -productVersion").and_then(|o| check_os_version(&o))
        {
            findings.push(finding);
        }
        if let Some(finding) = query("sysctl -n hw.memsize").and_then(|o| check_memory(&o)) {
            findings.push(finding);
        }
    }

    if let Some(finding) = query("df -k \"$HOME\"").and_then(|o| check_disk(&o)) {
        findings.push(finding);
    }

    findings
}

/// Warn when the macOS major version is below [`MIN_MACOS_MAJOR`].
pub fn check_os_version(output: &str) -> Option<Finding> {
    let version = output.trim();
    let major: u32 = version.split('.').next()?.parse().ok()?;
    if major < MIN_MACOS_MAJOR {
        Some(Finding::warning(format!(
            "macOS {} is older than {}; some packages may not install",
            version, MIN_MACOS_MAJOR
        )))
    } else {
        None
    }
}

/// Warn when physical memory (in bytes) is below [`MIN_MEMORY_BYTES`].
pub fn check_memory(output: &str) -> Option<Finding> {
    let bytes: u64 = output.trim().parse().ok()?;
    if bytes < MIN_MEMORY_BYTES {
        Some(Finding::warning(format!(
            "{} GB of memory detected; 8 GB or more is recommended for Docker",
            bytes / (1024 * 1024 * 1024)
        )))
    } else {
        None
    }
}

/// Report free disk space from `df -k` output.
pub fn check_disk(output: &str) -> Option<Finding> {
    let line = output.lines().nth(1)?;
    let available_kb: u64 = line.split_whitespace().nth(3)?.parse().ok()?;
    Some(Finding::info(format!(
        "{:.1} GB of free disk space",
        available_kb as f64 / (1024.0 * 1024.0)
    )))
}
