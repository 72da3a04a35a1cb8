//! Rendering sealed reports.

use std::fs;
use std::path::Path;

use crate::capabilities::installer::INTERRUPTED;
use crate::error::{KitupError, Result};
use crate::ui::UserInterface;

use super::hints;
use super::{Outcome, ProvisionResult, SealedReport};

/// Severity of one rendered line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

/// Severity of a result once verification is known.
pub fn severity_of(result: &ProvisionResult, report: &SealedReport) -> Severity {
    match result.outcome {
        Outcome::AlreadySatisfied | Outcome::Planned => Severity::Info,
        Outcome::Installed => {
            let verified = report
                .verification_of(&result.capability)
                .map_or(true, |s| s.is_satisfied());
            if verified {
                Severity::Success
            } else {
                Severity::Warning
            }
        }
        Outcome::Failed if result.detail == INTERRUPTED => Severity::Warning,
        Outcome::Failed => Severity::Error,
    }
}

/// One line describing a result.
pub fn result_line(result: &ProvisionResult) -> String {
    match result.outcome {
        Outcome::AlreadySatisfied => format!("{}: already satisfied", result.capability),
        Outcome::Failed if result.detail == INTERRUPTED => {
            format!("{}: interrupted", result.capability)
        }
        Outcome::Failed => format!("{} failed: {}", result.capability, result.detail),
        Outcome::Installed | Outcome::Planned => {
            format!("{}: {}", result.capability, result.detail)
        }
    }
}

/// Process exit code for a sealed report: 0 iff success.
pub fn exit_code(report: &SealedReport) -> i32 {
    if report.is_success() {
        0
    } else {
        1
    }
}

/// Write the JSON report to a file, creating parent directories.
pub fn write_report(report: &SealedReport, path: &Path) -> Result<()> {
    let json = report
        .to_json()
        .map_err(|e| KitupError::Other(anyhow::anyhow!("Failed to serialize report: {}", e)))?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, json + "\n")?;
    tracing::debug!("Wrote report to {}", path.display());
    Ok(())
}

/// Renders a [`SealedReport`] to the user interface.
pub struct Reporter<'a> {
    ui: &'a mut dyn UserInterface,
}

impl<'a> Reporter<'a> {
    pub fn new(ui: &'a mut dyn UserInterface) -> Self {
        Self { ui }
    }

    /// Render every result line and the summary. Returns the exit code.
    pub fn render(&mut self, report: &SealedReport) -> i32 {
        self.render_results(report);
        self.render_summary(report)
    }

    /// Render one leveled line per result, in run order.
    pub fn render_results(&mut self, report: &SealedReport) {
        for result in report.results() {
            let line = result_line(result);
            self.emit(severity_of(result, report), &line);
        }
    }

    /// Render the summary. Returns the exit code.
    ///
    /// Names every capability left unsatisfied, whether its provisioning
    /// failed or it only failed verification, each with its remediation
    /// and the prerequisites that had already failed before it.
    pub fn render_summary(&mut self, report: &SealedReport) -> i32 {
        let attention = report.needs_attention();
        if !attention.is_empty() {
            self.ui.show_header("Needs attention");
        }
        for item in &attention {
            match (item.result, item.status) {
                (Some(result), _) if result.is_failed() => {
                    let line = result_line(result);
                    self.emit(severity_of(result, report), &line);
                    if !result.failed_prerequisites.is_empty() {
                        self.ui.hint(&format!(
                            "after failed prerequisite(s): {}",
                            result.failed_prerequisites.join(" -> ")
                        ));
                    }
                }
                (Some(result), Some(status)) if result.outcome == Outcome::Installed => {
                    self.ui.error(&format!(
                        "{} reported installed but does not verify: {}",
                        item.capability, status
                    ));
                }
                (_, Some(status)) => {
                    self.ui.error(&format!(
                        "{} no longer verifies: {}",
                        item.capability, status
                    ));
                }
                (_, None) => {}
            }
            if let Some(text) = report.remediation_of(item.capability) {
                self.ui.hint(text);
            }
        }

        let planned = report
            .results()
            .iter()
            .filter(|r| r.outcome == Outcome::Planned)
            .count();

        if report.is_success() {
            self.ui.success(&format!(
                "Environment ready ({} verified)",
                count(report.verification().len(), "capability", "capabilities")
            ));
            self.ui.hint(hints::after_successful_run());
        } else if report.is_interrupted() {
            self.ui.warning("Run interrupted before every capability was provisioned");
            self.ui.hint(hints::after_interrupt());
        } else if attention.is_empty() && planned > 0 {
            self.ui.info(&format!(
                "Dry run: {} would change",
                count(planned, "capability", "capabilities")
            ));
            self.ui.hint(hints::after_dry_run());
        } else {
            let names: Vec<String> = attention.iter().map(|a| a.capability.to_string()).collect();
            self.ui.error(&format!(
                "Provisioning incomplete: {} failed",
                count(names.len(), "capability", "capabilities")
            ));
            self.ui.hint(&hints::after_failed_run(&names));
        }

        exit_code(report)
    }

    /// Print the report as JSON. Returns the exit code.
    pub fn render_json(&mut self, report: &SealedReport) -> Result<i32> {
        let json = report
            .to_json()
            .map_err(|e| KitupError::Other(anyhow::anyhow!("Failed to serialize report: {}", e)))?;
        self.ui.message(&json);
        Ok(exit_code(report))
    }

    fn emit(&mut self, severity: Severity, line: &str) {
        match severity {
            Severity::Info => self.ui.info(line),
            Severity::Success => self.ui.success(line),
            Severity::Warning => self.ui.warning(line),
            Severity::Error => self.ui.error(line),
        }
    }
}

fn count(n: usize, one: &str, many: &str) -> String {
    format!("{} {}", n, if n == 1 { one } else { many })
}
