//! Homebrew package manager.

use std::path::PathBuf;

use crate::backends::PackageManager;
use crate::capabilities::Platform;
use crate::error::Result;
use crate::shell::{execute, execute_required, CommandOptions};

/// Drives `<package_root>/bin/brew`.
#[derive(Debug, Clone)]
pub struct Homebrew {
    brew: PathBuf,
    search_path: Vec<PathBuf>,
}

impl Homebrew {
    /// Homebrew under the platform's package root.
    pub fn new(platform: &Platform, search_path: Vec<PathBuf>) -> Self {
        Self {
            brew: platform.package_root.join("bin").join("brew"),
            search_path,
        }
    }

    /// Path of the brew executable.
    pub fn executable(&self) -> &PathBuf {
        &self.brew
    }

    fn command(&self, args: &str) -> String {
        format!("\"{}\" {}", self.brew.display(), args)
    }

    fn options(&self) -> CommandOptions {
        let mut options = CommandOptions::on_path(&self.search_path);
        options
            .env
            .insert("HOMEBREW_NO_AUTO_UPDATE".to_string(), "1".to_string());
        options
            .env
            .insert("NONINTERACTIVE".to_string(), "1".to_string());
        options
    }
}

impl PackageManager for Homebrew {
    fn is_installed(&self, package: &str) -> bool {
        execute(
            &self.command(&format!("list --versions {}", package)),
            &self.options(),
        )
        .map(|r| r.success && !r.stdout.trim().is_empty())
        .unwrap_or(false)
    }

    fn install(&self, package: &str, cask: bool) -> Result<()> {
        let args = if cask {
            format!("install --cask {}", package)
        } else {
            format!("install {}", package)
        };
        tracing::info!("Installing {} with Homebrew", package);
        execute_required(&self.command(&args), &self.options())?;
        Ok(())
    }

    fn link(&self, package: &str) -> Result<()> {
        tracing::info!("Linking {}", package);
        execute_required(
            &self.command(&format!("link --overwrite --force {}", package)),
            &self.options(),
        )?;
        Ok(())
    }
}
