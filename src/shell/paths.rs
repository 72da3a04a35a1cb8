//! Executable search path resolution.
//!
//! Non-interactive processes do not source the user's shell profile, so a
//! freshly installed package-manager prefix is usually not on `PATH` yet.
//! The search path used for probes and commands is therefore the system
//! `PATH` plus the package-manager bin directories.

use std::path::{Path, PathBuf};

/// Check whether a file has executable permission bits set.
#[cfg(unix)]
pub fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
pub fn is_executable(_path: &Path) -> bool {
    true
}

/// Resolve a tool's binary path by iterating over search path entries.
///
/// Returns the first match that exists and is executable. Does NOT use
/// the `which` command, whose behavior varies across systems.
pub fn resolve_tool_path(tool: &str, path_entries: &[PathBuf]) -> Option<PathBuf> {
    if tool.contains('/') {
        let candidate = PathBuf::from(tool);
        return (candidate.is_file() && is_executable(&candidate)).then_some(candidate);
    }
    path_entries
        .iter()
        .map(|dir| dir.join(tool))
        .find(|candidate| candidate.is_file() && is_executable(candidate))
}

/// Parse the system PATH environment variable into a list of directories.
pub fn parse_system_path() -> Vec<PathBuf> {
    std::env::var_os("PATH")
        .map(|path| std::env::split_paths(&path).collect())
        .unwrap_or_default()
}

/// Append `extra` directories to `base`, skipping duplicates.
pub fn augment_path(base: &[PathBuf], extra: &[PathBuf]) -> Vec<PathBuf> {
    let mut result = base.to_vec();
    for dir in extra {
        if !result.contains(dir) {
            result.push(dir.clone());
        }
    }
    result
}
