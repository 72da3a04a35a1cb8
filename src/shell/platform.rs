//! Login shell detection.

use std::path::{Path, PathBuf};

/// Known shell types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellType {
    Bash,
    Zsh,
    Fish,
    Unknown,
}

impl ShellType {
    /// Parse shell type from executable name.
    pub fn from_executable(exe: &str) -> Self {
        let name = Path::new(exe)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_lowercase();

        match name.as_str() {
            "bash" => ShellType::Bash,
            "zsh" => ShellType::Zsh,
            "fish" => ShellType::Fish,
            _ => ShellType::Unknown,
        }
    }

    /// The shell of the current user, from `$SHELL`.
    pub fn current() -> Self {
        std::env::var("SHELL")
            .map(|s| Self::from_executable(&s))
            .unwrap_or(ShellType::Unknown)
    }

    /// Login profile that exports belong in, relative to the home directory.
    ///
    /// Fish does not read POSIX `export` lines, so it falls back to `.profile`
    /// like any unknown shell.
    pub fn profile_file(self) -> &'static str {
        match self {
            ShellType::Zsh => ".zprofile",
            ShellType::Bash => ".bash_profile",
            ShellType::Fish | ShellType::Unknown => ".profile",
        }
    }
}

/// The user's home directory, falling back to `/`.
pub fn home_dir() -> PathBuf {
    dirs_next::home_dir().unwrap_or_else(|| PathBuf::from("/"))
}

/// Default shell profile path for the current user.
pub fn default_profile_path() -> PathBuf {
    home_dir().join(ShellType::current().profile_file())
}

/// Expand a leading `~` to the home directory.
pub fn expand_home(path: &str) -> PathBuf {
    expand_home_with(path, &home_dir())
}

/// Expand a leading `~` against an explicit home directory.
pub fn expand_home_with(path: &str, home: &Path) -> PathBuf {
    if path == "~" {
        home.to_path_buf()
    } else if let Some(rest) = path.strip_prefix("~/") {
        home.join(rest)
    } else {
        PathBuf::from(path)
    }
}

/// Check if running in a CI environment.
///
/// Checks common CI environment variables: `CI`, `GITHUB_ACTIONS`,
/// `GITLAB_CI`, `CIRCLECI`, `TRAVIS`, `JENKINS_URL`.
pub fn is_ci() -> bool {
    std::env::var("CI").is_ok()
        || std::env::var("GITHUB_ACTIONS").is_ok()
        || std::env::var("GITLAB_CI").is_ok()
        || std::env::var("CIRCLECI").is_ok()
        || std::env::var("TRAVIS").is_ok()
        || std::env::var("JENKINS_URL").is_ok()
}
