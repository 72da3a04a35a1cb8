//! Host platform detection.
//!
//! The [`Platform`] is computed once at process start and passed by
//! reference into every component. Everything that depends on the CPU
//! architecture (package prefix, container platform, shell exports) is
//! derived from it by exhaustive matching.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::error::{KitupError, Result};

/// Operating system family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OsFamily {
    MacOs,
    Other,
}

/// CPU architecture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Arch {
    Arm64,
    X86_64,
}

impl Arch {
    /// Parse an architecture name as reported by `uname -m` or the Rust target.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim() {
            "arm64" | "aarch64" => Some(Arch::Arm64),
            "x86_64" | "amd64" => Some(Arch::X86_64),
            _ => None,
        }
    }

    /// Canonical name.
    pub fn as_str(self) -> &'static str {
        match self {
            Arch::Arm64 => "arm64",
            Arch::X86_64 => "x86_64",
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The host platform a provisioning run targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Platform {
    /// Operating system family.
    pub os_family: OsFamily,
    /// CPU architecture.
    pub arch: Arch,
    /// Root of the platform package manager (e.g. `/opt/homebrew`).
    pub package_root: PathBuf,
}

impl Platform {
    /// Build a platform from its parts, deriving the package root.
    pub fn new(os_family: OsFamily, arch: Arch) -> Self {
        let package_root = match (os_family, arch) {
            (OsFamily::MacOs, Arch::Arm64) => PathBuf::from("/opt/homebrew"),
            (OsFamily::MacOs, Arch::X86_64) => PathBuf::from("/usr/local"),
            (OsFamily::Other, _) => PathBuf::from("/home/linuxbrew/.linuxbrew"),
        };
        Self {
            os_family,
            arch,
            package_root,
        }
    }

    /// Detect the current host.
    ///
    /// An architecture other than arm64/x86_64 is always unsupported. A
    /// non-macOS host is unsupported unless `allow_other_os` is set.
    pub fn detect(allow_other_os: bool) -> Result<Self> {
        let os_family = if cfg!(target_os = "macos") {
            OsFamily::MacOs
        } else {
            OsFamily::Other
        };
        Self::from_host(os_family, std::env::consts::ARCH, allow_other_os)
    }

    /// Validate a host description and build the platform.
    pub fn from_host(os_family: OsFamily, arch_name: &str, allow_other_os: bool) -> Result<Self> {
        let arch = Arch::parse(arch_name).ok_or_else(|| KitupError::UnsupportedPlatform {
            message: format!("architecture '{}' is not supported", arch_name),
        })?;

        if os_family == OsFamily::Other && !allow_other_os {
            return Err(KitupError::UnsupportedPlatform {
                message: "only macOS hosts are provisioned by default; \
                          set `allow_unsupported_os: true` to continue anyway"
                    .to_string(),
            });
        }

        let platform = Self::new(os_family, arch);
        tracing::debug!(
            "Detected platform {:?}/{} (package root {})",
            platform.os_family,
            platform.arch,
            platform.package_root.display()
        );
        Ok(platform)
    }

    /// Container image platform matching the host architecture.
    pub fn container_platform(&self) -> &'static str {
        match self.arch {
            Arch::Arm64 => "linux/arm64",
            Arch::X86_64 => "linux/amd64",
        }
    }

    /// Human-readable architecture label.
    pub fn arch_label(&self) -> &'static str {
        match (self.os_family, self.arch) {
            (OsFamily::MacOs, Arch::Arm64) => "Apple Silicon (arm64)",
            (OsFamily::MacOs, Arch::X86_64) => "Intel (x86_64)",
            (OsFamily::Other, Arch::Arm64) => "arm64",
            (OsFamily::Other, Arch::X86_64) => "x86_64",
        }
    }

    /// Directories under the package root that hold executables.
    pub fn package_bin_dirs(&self) -> Vec<PathBuf> {
        vec![self.package_root.join("bin"), self.package_root.join("sbin")]
    }
}
