//! Check command implementation.
//!
//! The `kitup check` command probes every capability and reports status
//! without installing anything. Exit code 0 means every capability is
//! satisfied.

use std::path::{Path, PathBuf};

use crate::backends::FileProfile;
use crate::capabilities::{Probe, ProbeStatus, SystemProbe};
use crate::cli::args::CheckArgs;
use crate::error::{KitupError, Result};
use crate::report::{hints, Verification};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};
use super::setup::ProjectSetup;

/// The check command implementation.
pub struct CheckCommand {
    project_root: PathBuf,
    config_path: Option<PathBuf>,
    args: CheckArgs,
}

impl CheckCommand {
    /// Create a new check command.
    pub fn new(project_root: &Path, config_path: Option<&Path>, args: CheckArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            config_path: config_path.map(Path::to_path_buf),
            args,
        }
    }
}

impl Command for CheckCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let setup = ProjectSetup::load(&self.project_root, self.config_path.as_deref())?;
        let profile = FileProfile::new(&setup.run_config.profile_path);
        let probe = SystemProbe::new(&setup.platform, &setup.run_config.project_root, &profile)
            .http_timeout(setup.run_config.http_timeout);

        let statuses: Vec<Verification> = setup
            .registry
            .resolve_order()?
            .into_iter()
            .map(|cap| Verification {
                capability: cap.name.clone(),
                status: probe.detect(cap),
            })
            .collect();

        let unsatisfied: Vec<String> = statuses
            .iter()
            .filter(|v| !v.status.is_satisfied())
            .map(|v| v.capability.clone())
            .collect();

        if self.args.json {
            let json = serde_json::to_string_pretty(&statuses).map_err(|e| {
                KitupError::Other(anyhow::anyhow!("Failed to serialize status: {}", e))
            })?;
            ui.message(&json);
        } else {
            ui.show_header(&format!("Checking {} capabilities", statuses.len()));
            for v in &statuses {
                match &v.status {
                    ProbeStatus::Satisfied => ui.success(&format!("{}: satisfied", v.capability)),
                    ProbeStatus::WrongVersion { .. } => {
                        ui.warning(&format!("{}: {}", v.capability, v.status))
                    }
                    _ => ui.error(&format!("{}: {}", v.capability, v.status)),
                }
            }

            if unsatisfied.is_empty() {
                ui.success("All capabilities satisfied");
            } else {
                ui.error(&format!(
                    "{} of {} capabilities not satisfied",
                    unsatisfied.len(),
                    statuses.len()
                ));
                ui.hint(&hints::after_check(&unsatisfied));
            }
        }

        Ok(if unsatisfied.is_empty() {
            CommandResult::success()
        } else {
            CommandResult::failure(1)
        })
    }
}
