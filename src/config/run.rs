//! Effective settings for one provisioning run.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::capabilities::RetryPolicy;
use crate::config::schema::Settings;
use crate::shell;

/// Everything a run needs to know, resolved from config and flags.
///
/// Passed explicitly to the parts that need it; nothing reads ambient
/// global settings.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfiguration {
    pub project_root: PathBuf,
    pub profile_path: PathBuf,
    pub retry: RetryPolicy,
    pub allow_unsupported_os: bool,
    pub http_timeout: Duration,
    pub preflight: bool,
    pub assume_yes: bool,
    pub dry_run: bool,
}

impl RunConfiguration {
    /// Resolve settings against a project root.
    ///
    /// A relative `profile` resolves against the home directory, the
    /// usual home of shell profiles.
    pub fn from_settings(project_root: &Path, settings: &Settings) -> Self {
        let profile_path = match &settings.profile {
            Some(path) => {
                let expanded = shell::expand_home(&path.to_string_lossy());
                if expanded.is_absolute() {
                    expanded
                } else {
                    shell::home_dir().join(expanded)
                }
            }
            None => shell::default_profile_path(),
        };

        Self {
            project_root: project_root.to_path_buf(),
            profile_path,
            retry: settings.retry,
            allow_unsupported_os: settings.allow_unsupported_os,
            http_timeout: Duration::from_secs(settings.http_timeout_secs),
            preflight: settings.preflight,
            assume_yes: false,
            dry_run: false,
        }
    }

    /// Builder: skip the confirmation prompt.
    pub fn assume_yes(mut self, yes: bool) -> Self {
        self.assume_yes = yes;
        self
    }

    /// Builder: report what would run without running it.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn carries_settings() {
        let settings = Settings {
            allow_unsupported_os: true,
            retry: RetryPolicy::new(3, 1),
            http_timeout_secs: 9,
            ..Default::default()
        };
        let config = RunConfiguration::from_settings(Path::new("/proj"), &settings)
            .assume_yes(true)
            .dry_run(true);

        assert_eq!(config.project_root, PathBuf::from("/proj"));
        assert!(config.allow_unsupported_os);
        assert_eq!(config.retry, RetryPolicy::new(3, 1));
        assert_eq!(config.http_timeout, Duration::from_secs(9));
        assert!(config.assume_yes);
        assert!(config.dry_run);
    }

    #[test]
    fn absolute_profile_is_kept() {
        let settings = Settings {
            profile: Some(PathBuf::from("/tmp/kitup-profile")),
            ..Default::default()
        };
        let config = RunConfiguration::from_settings(Path::new("/proj"), &settings);
        assert_eq!(config.profile_path, PathBuf::from("/tmp/kitup-profile"));
    }

    #[test]
    fn relative_profile_resolves_under_home() {
        let settings = Settings {
            profile: Some(PathBuf::from(".zshrc")),
            ..Default::default()
        };
        let config = RunConfiguration::from_settings(Path::new("/proj"), &settings);
        assert_eq!(config.profile_path, shell::home_dir().join(".zshrc"));
    }
}
