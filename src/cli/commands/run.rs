//! Run command implementation.
//!
//! The `kitup run` command provisions every capability: preflight
//! diagnostics, a probe pass, an optional confirmation, then the engine,
//! the verifier and the reporter.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::backends::{CommandServiceRuntime, FileProfile, Homebrew};
use crate::capabilities::installer::INTERRUPTED;
use crate::capabilities::{Installer, InstallerContext, Probe, SystemProbe};
use crate::cli::args::RunArgs;
use crate::error::Result;
use crate::report::render::{result_line, write_report};
use crate::report::{hints, Outcome, ProvisionResult, Reporter};
use crate::runner::{
    preflight, CancelFlag, FindingLevel, ProvisionEvent, ProvisioningEngine, Verifier,
};
use crate::shell::{self, CommandOptions};
use crate::ui::{SpinnerHandle, UserInterface};

use super::dispatcher::{Command, CommandResult};
use super::setup::{query_host, ProjectSetup};

/// The run command implementation.
pub struct RunCommand {
    project_root: PathBuf,
    config_path: Option<PathBuf>,
    args: RunArgs,
}

impl RunCommand {
    /// Create a new run command.
    pub fn new(project_root: &Path, config_path: Option<&Path>, args: RunArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            config_path: config_path.map(Path::to_path_buf),
            args,
        }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &RunArgs {
        &self.args
    }
}

impl Command for RunCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let setup = ProjectSetup::load(&self.project_root, self.config_path.as_deref())?;
        let run_config = setup
            .run_config
            .clone()
            .assume_yes(self.args.yes)
            .dry_run(self.args.dry_run);
        let platform = &setup.platform;
        let registry = &setup.registry;
        let text = !self.args.json;

        if text {
            ui.show_header(&format!(
                "Provisioning {} capabilities on {}",
                registry.len(),
                platform.arch_label()
            ));
            if run_config.dry_run {
                ui.message("Dry run: nothing will be installed");
            }
        }

        if text && run_config.preflight {
            let root = run_config.project_root.clone();
            for finding in preflight::run_checks(platform, &|cmd: &str| query_host(cmd, &root)) {
                match finding.level {
                    FindingLevel::Info => ui.info(&finding.message),
                    FindingLevel::Warning => ui.warning(&finding.message),
                }
            }
        }

        let cancel = CancelFlag::with_interrupt();
        let profile = FileProfile::new(&run_config.profile_path);
        let probe = SystemProbe::new(platform, &run_config.project_root, &profile)
            .http_timeout(run_config.http_timeout);
        let search_path = probe.search_path().to_vec();

        let missing: Vec<&str> = registry
            .resolve_order()?
            .into_iter()
            .filter(|cap| !probe.detect(cap).is_satisfied())
            .map(|cap| cap.name.as_str())
            .collect();

        if !missing.is_empty()
            && !run_config.dry_run
            && !run_config.assume_yes
            && ui.is_interactive()
        {
            ui.message(&format!("Missing: {}", missing.join(", ")));
            let question = format!("Install {} missing capabilities now?", missing.len());
            if !ui.confirm("install_missing", &question, true)? {
                ui.warning("Provisioning cancelled");
                ui.hint(hints::after_decline());
                return Ok(CommandResult::failure(1));
            }
        }

        let packages = Homebrew::new(platform, search_path.clone());
        let services = CommandServiceRuntime::new(search_path.clone());
        let root = run_config.project_root.clone();
        let run_command = |command: &str| -> bool {
            let options = CommandOptions {
                cwd: Some(root.clone()),
                ..CommandOptions::on_path(&search_path)
            };
            match shell::execute(command, &options) {
                Ok(result) => {
                    if !result.success {
                        tracing::debug!("`{}` output:\n{}", command, result.combined_output());
                    }
                    result.success
                }
                Err(e) => {
                    tracing::debug!("{}", e);
                    false
                }
            }
        };
        let sleep = |delay: Duration| cancel.sleep(delay);

        let installer = Installer::new(
            &probe,
            InstallerContext {
                packages: &packages,
                services: &services,
                profile: &profile,
                run_command: &run_command,
                sleep: &sleep,
                cancel: &cancel,
            },
        )
        .default_retry(run_config.retry)
        .dry_run(run_config.dry_run);

        let engine = ProvisioningEngine::new(&installer, &cancel);
        let show_progress = text && ui.output_mode().shows_progress();
        let show_detail = ui.output_mode().shows_detail();
        let mut spinner: Option<Box<dyn SpinnerHandle>> = None;

        let report = engine.run_with_progress(registry, platform, |event| {
            if !show_progress {
                return;
            }
            match event {
                ProvisionEvent::Starting { name, index, total } => {
                    let label = format!("[{}/{}] {}", index + 1, total, name);
                    spinner = Some(ui.start_spinner(&label));
                }
                ProvisionEvent::Waiting { message, .. } => {
                    if let Some(s) = spinner.as_mut() {
                        s.set_message(message);
                    }
                    if show_detail {
                        tracing::info!("{}", message);
                    }
                }
                ProvisionEvent::Finished { result } => {
                    if let Some(mut s) = spinner.take() {
                        finish_spinner(s.as_mut(), result);
                    }
                }
            }
        })?;

        let sealed = Verifier::new(&probe).verify(report, registry);

        if let Some(path) = &self.args.report {
            write_report(&sealed, path)?;
        }

        let code = if self.args.json {
            Reporter::new(ui).render_json(&sealed)?
        } else if show_progress {
            Reporter::new(ui).render_summary(&sealed)
        } else {
            Reporter::new(ui).render(&sealed)
        };

        Ok(if code == 0 {
            CommandResult::success()
        } else {
            CommandResult::failure(code)
        })
    }
}

/// Finish a live spinner with the result line at its provisional severity.
fn finish_spinner(spinner: &mut dyn SpinnerHandle, result: &ProvisionResult) {
    let line = result_line(result);
    match result.outcome {
        Outcome::AlreadySatisfied | Outcome::Planned => spinner.finish_info(&line),
        Outcome::Installed => spinner.finish_success(&line),
        Outcome::Failed if result.detail == INTERRUPTED => spinner.finish_warning(&line),
        Outcome::Failed => spinner.finish_error(&line),
    }
}
