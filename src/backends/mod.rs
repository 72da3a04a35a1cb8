//! External systems that install and start things.
//!
//! The installer only talks to these traits, so tests substitute in-memory
//! fakes and the real implementations stay thin wrappers over commands and
//! files.

pub mod homebrew;
pub mod profile;
pub mod service;

pub use homebrew::Homebrew;
pub use profile::FileProfile;
pub use service::CommandServiceRuntime;

use crate::error::Result;

/// Platform package manager.
pub trait PackageManager {
    /// Whether the package (e.g. `python@3.11`) is installed.
    fn is_installed(&self, package: &str) -> bool;

    /// Install the package, as a cask when `cask` is set.
    fn install(&self, package: &str, cask: bool) -> Result<()>;

    /// Force-link a versioned package so its executables win on the path.
    fn link(&self, package: &str) -> Result<()>;
}

/// Background service control.
pub trait ServiceRuntime {
    /// Run the readiness check; true when the service answers.
    fn is_running(&self, check: &str) -> bool;

    /// Run the start command once.
    fn start(&self, start: &str) -> Result<()>;
}

/// Login shell profile.
pub trait ShellProfile {
    /// Whether the profile already contains this exact line.
    fn contains(&self, line: &str) -> bool;

    /// Append the line unless it is already present.
    fn append(&self, line: &str) -> Result<()>;
}
