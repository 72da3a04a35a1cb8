//! Shared project setup for commands.
//!
//! Everything here happens before any probe or install, so every error is
//! a fatal setup error.

use std::path::Path;

use crate::capabilities::{CapabilityRegistry, Platform};
use crate::config::{load_config, validate, KitupConfig, RunConfiguration};
use crate::error::Result;
use crate::shell::{self, CommandOptions};

/// Loaded config, detected platform and the resolved registry.
#[derive(Debug)]
pub struct ProjectSetup {
    pub config: KitupConfig,
    pub run_config: RunConfiguration,
    pub platform: Platform,
    pub registry: CapabilityRegistry,
}

impl ProjectSetup {
    /// Load config, detect the platform and build the registry.
    pub fn load(project_root: &Path, config_path: Option<&Path>) -> Result<Self> {
        let config = load_config(project_root, config_path)?;
        validate(&config)?;

        let run_config = RunConfiguration::from_settings(project_root, &config.settings);
        let platform = Platform::detect(run_config.allow_unsupported_os)?;
        let registry = build_registry(&config, &platform)?;

        tracing::debug!(
            "{} capabilities for {} ({})",
            registry.len(),
            platform.arch_label(),
            platform.package_root.display()
        );

        Ok(Self {
            config,
            run_config,
            platform,
            registry,
        })
    }
}

/// The built-in stack (unless disabled) merged with project capabilities.
///
/// The built-in set is checked on its own first, so a broken built-in
/// is reported as such rather than blamed on project config.
pub fn build_registry(config: &KitupConfig, platform: &Platform) -> Result<CapabilityRegistry> {
    if config.settings.builtin {
        CapabilityRegistry::builtin(platform)?.with_custom(config.capabilities.clone())
    } else {
        CapabilityRegistry::new(config.capabilities.clone())
    }
}

/// Run a host query command, returning trimmed stdout on success.
pub fn query_host(command: &str, project_root: &Path) -> Option<String> {
    let options = CommandOptions {
        cwd: Some(project_root.to_path_buf()),
        ..CommandOptions::on_path(&shell::parse_system_path())
    };
    shell::execute(command, &options)
        .ok()
        .filter(|r| r.success)
        .map(|r| r.stdout.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::platform::{Arch, OsFamily};
    use crate::capabilities::{Action, Capability, Detect};
    use crate::error::KitupError;

    fn file_cap(name: &str) -> Capability {
        Capability::new(
            name,
            Detect::File {
                path: format!("{}.marker", name),
            },
            Action::Shell {
                command: format!("touch {}.marker", name),
            },
        )
    }

    #[test]
    fn builtin_registry_with_project_additions() {
        let platform = Platform::new(OsFamily::MacOs, Arch::Arm64);
        let config = KitupConfig {
            capabilities: vec![file_cap("seed").requires(["git"])],
            ..Default::default()
        };

        let registry = build_registry(&config, &platform).unwrap();
        assert!(registry.get("brew").is_some());
        assert_eq!(
            registry.capabilities().last().map(|c| c.name.as_str()),
            Some("seed")
        );
    }

    #[test]
    fn builtin_disabled_uses_project_only() {
        let platform = Platform::new(OsFamily::MacOs, Arch::X86_64);
        let mut config = KitupConfig {
            capabilities: vec![file_cap("a"), file_cap("b").requires(["a"])],
            ..Default::default()
        };
        config.settings.builtin = false;

        let registry = build_registry(&config, &platform).unwrap();
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn project_cycle_is_fatal() {
        let platform = Platform::new(OsFamily::MacOs, Arch::Arm64);
        let mut config = KitupConfig {
            capabilities: vec![
                file_cap("a").requires(["b"]),
                file_cap("b").requires(["a"]),
            ],
            ..Default::default()
        };
        config.settings.builtin = false;

        let result = build_registry(&config, &platform);
        assert!(matches!(
            result,
            Err(KitupError::CircularDependency { .. })
        ));
    }

    #[test]
    fn query_host_returns_trimmed_stdout() {
        let dir = tempfile::TempDir::new().unwrap();
        assert_eq!(
            query_host("echo '  hi  '", dir.path()),
            Some("hi".to_string())
        );
        assert_eq!(query_host("exit 3", dir.path()), None);
    }
}
