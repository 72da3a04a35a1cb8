//! Capability detection.
//!
//! A probe answers "is this capability present?" without changing anything
//! on the host. Every negative answer (tool absent, wrong version, service
//! not answering, endpoint unreachable) is a [`ProbeStatus`], never an error.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;

use crate::backends::ShellProfile;
use crate::capabilities::platform::Platform;
use crate::capabilities::registry::{Capability, Detect};
use crate::capabilities::status::ProbeStatus;
use crate::shell::{self, CommandOptions};

/// Timeout for `http` probes.
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(5);

/// Read-only capability detection.
pub trait Probe {
    /// Detect the current state of a capability.
    fn detect(&self, capability: &Capability) -> ProbeStatus;
}

/// Probe backed by the real host: executables, commands, HTTP and files.
pub struct SystemProbe<'a> {
    search_path: Vec<PathBuf>,
    project_root: PathBuf,
    profile: &'a dyn ShellProfile,
    http_timeout: Duration,
}

impl<'a> SystemProbe<'a> {
    /// Probe that searches the system `PATH` plus the package-manager bin dirs.
    pub fn new(platform: &Platform, project_root: &Path, profile: &'a dyn ShellProfile) -> Self {
        let search_path =
            shell::augment_path(&shell::parse_system_path(), &platform.package_bin_dirs());
        Self::with_search_path(search_path, project_root, profile)
    }

    /// Probe with an explicit executable search path.
    pub fn with_search_path(
        search_path: Vec<PathBuf>,
        project_root: &Path,
        profile: &'a dyn ShellProfile,
    ) -> Self {
        Self {
            search_path,
            project_root: project_root.to_path_buf(),
            profile,
            http_timeout: HTTP_TIMEOUT,
        }
    }

    /// Override the HTTP timeout.
    pub fn http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = timeout;
        self
    }

    /// The executable search path used for detection.
    pub fn search_path(&self) -> &[PathBuf] {
        &self.search_path
    }

    fn detect_command(&self, name: &str, version: Option<&str>) -> ProbeStatus {
        let Some(resolved) = shell::resolve_tool_path(name, &self.search_path) else {
            return ProbeStatus::missing(format!("`{}` not found on the search path", name));
        };

        let Some(required) = version else {
            return ProbeStatus::Satisfied;
        };

        let command = format!("\"{}\" --version", resolved.display());
        let output = shell::execute(&command, &CommandOptions::on_path(&self.search_path))
            .map(|r| r.combined_output())
            .unwrap_or_default();

        match extract_version(&output) {
            Some(found) if version_matches(&found, required) => ProbeStatus::Satisfied,
            Some(found) => ProbeStatus::WrongVersion {
                found,
                required: required.to_string(),
            },
            None => ProbeStatus::WrongVersion {
                found: output
                    .lines()
                    .next()
                    .filter(|l| !l.trim().is_empty())
                    .unwrap_or("unknown")
                    .trim()
                    .to_string(),
                required: required.to_string(),
            },
        }
    }

    fn detect_service(&self, check: &str) -> ProbeStatus {
        match shell::execute(check, &CommandOptions::on_path(&self.search_path)) {
            Ok(result) if result.success => ProbeStatus::Satisfied,
            Ok(result) => ProbeStatus::service_down(match result.last_line() {
                Some(line) => format!("`{}` failed: {}", check, line),
                None => format!("`{}` exited with {:?}", check, result.exit_code),
            }),
            Err(e) => ProbeStatus::service_down(e.to_string()),
        }
    }

    fn detect_http(&self, url: &str) -> ProbeStatus {
        let client = match reqwest::blocking::Client::builder()
            .user_agent("kitup")
            .timeout(self.http_timeout)
            .build()
        {
            Ok(client) => client,
            Err(e) => return ProbeStatus::service_down(format!("HTTP client error: {}", e)),
        };

        match client.get(url).send() {
            Ok(response) if response.status().is_success() => ProbeStatus::Satisfied,
            Ok(response) => {
                ProbeStatus::service_down(format!("{} answered {}", url, response.status()))
            }
            Err(e) => ProbeStatus::service_down(format!("{} unreachable: {}", url, e)),
        }
    }

    fn detect_file(&self, path: &str) -> ProbeStatus {
        let expanded = shell::expand_home(path);
        let full_path = if expanded.is_absolute() {
            expanded
        } else {
            self.project_root.join(expanded)
        };

        if full_path.exists() {
            ProbeStatus::Satisfied
        } else {
            ProbeStatus::missing(format!("{} does not exist", full_path.display()))
        }
    }

    fn detect_profile(&self, lines: &[String]) -> ProbeStatus {
        let missing = lines.iter().filter(|l| !self.profile.contains(l)).count();
        if missing == 0 {
            ProbeStatus::Satisfied
        } else {
            ProbeStatus::missing(format!(
                "{} of {} line(s) missing from the shell profile",
                missing,
                lines.len()
            ))
        }
    }
}

impl Probe for SystemProbe<'_> {
    fn detect(&self, capability: &Capability) -> ProbeStatus {
        let status = match &capability.detect {
            Detect::Command { name, version } => self.detect_command(name, version.as_deref()),
            Detect::Service { check } => self.detect_service(check),
            Detect::Http { url } => self.detect_http(url),
            Detect::File { path } => self.detect_file(path),
            Detect::Profile { lines } => self.detect_profile(lines),
        };
        tracing::debug!("Probe {}: {}", capability.name, status);
        status
    }
}

static VERSION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:\.\d+)+|\d+").expect("valid version regex"));

/// Extract the first dotted version number from tool output.
///
/// `"Python 3.11.9"` yields `3.11.9`.
pub fn extract_version(output: &str) -> Option<String> {
    VERSION_REGEX
        .find(output)
        .map(|m| m.as_str().to_string())
}

/// Whether `found` starts with the components of `required`.
///
/// Compares whole components: `3.11` accepts `3.11` and `3.11.9` but not
/// `3.12.1` or `3.110`.
pub fn version_matches(found: &str, required: &str) -> bool {
    let found: Vec<&str> = found.split('.').collect();
    let required: Vec<&str> = required.trim().split('.').collect();
    required.len() <= found.len() && required.iter().zip(&found).all(|(r, f)| r == f)
}
