//! List command implementation.
//!
//! The `kitup list` command shows capabilities in install order.

use std::path::{Path, PathBuf};

use serde_json::json;

use crate::cli::args::ListArgs;
use crate::error::{KitupError, Result};
use crate::ui::theme::KitupTheme;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};
use super::setup::ProjectSetup;

/// The list command implementation.
pub struct ListCommand {
    project_root: PathBuf,
    config_path: Option<PathBuf>,
    args: ListArgs,
}

impl ListCommand {
    /// Create a new list command.
    pub fn new(project_root: &Path, config_path: Option<&Path>, args: ListArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            config_path: config_path.map(Path::to_path_buf),
            args,
        }
    }
}

impl Command for ListCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let setup = ProjectSetup::load(&self.project_root, self.config_path.as_deref())?;
        let order = setup.registry.resolve_order()?;

        if self.args.json {
            let entries: Vec<_> = order
                .iter()
                .map(|cap| {
                    json!({
                        "name": cap.name,
                        "requires": cap.prerequisites,
                        "detect": cap.detect,
                        "install": cap.install,
                    })
                })
                .collect();
            let text = serde_json::to_string_pretty(&entries).map_err(|e| {
                KitupError::Other(anyhow::anyhow!("Failed to serialize list: {}", e))
            })?;
            ui.message(&text);
            return Ok(CommandResult::success());
        }

        let theme = KitupTheme::new();
        ui.message(&format!("  {}", theme.header.apply_to("Capabilities:")));
        for (index, cap) in order.iter().enumerate() {
            let requires = if cap.prerequisites.is_empty() {
                String::new()
            } else {
                format!(
                    " {}",
                    theme
                        .dim
                        .apply_to(format!("(requires: {})", cap.prerequisites.join(", ")))
                )
            };
            ui.message(&format!(
                "  {:>2}. {}{}",
                index + 1,
                theme.highlight.apply_to(&cap.name),
                requires
            ));
            ui.message(&format!(
                "      {}",
                theme.command.apply_to(cap.install.preview(&setup.platform))
            ));
        }

        Ok(CommandResult::success())
    }
}
