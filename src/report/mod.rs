//! Provisioning results and run reports.
//!
//! The engine appends one [`ProvisionResult`] per capability to a mutable
//! [`RunReport`]. Only the verifier can turn it into a [`SealedReport`],
//! which is the only form the reporter accepts and the only form that
//! carries an [`Overall`] verdict.

pub mod hints;
pub mod render;

pub use render::Reporter;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::capabilities::{Platform, ProbeStatus};

/// What happened to one capability during provisioning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Probe was satisfied before any action ran.
    AlreadySatisfied,
    /// An action ran and the capability then probed satisfied.
    Installed,
    /// Dry run: the action that would run was recorded, nothing changed.
    Planned,
    /// Every attempt was exhausted, or the run was interrupted.
    Failed,
}

/// Result of provisioning one capability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProvisionResult {
    pub capability: String,
    pub outcome: Outcome,
    pub detail: String,
    /// Install attempts made (0 when nothing ran).
    pub attempts: u32,
    /// Prerequisites of this capability that had already failed.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failed_prerequisites: Vec<String>,
}

impl ProvisionResult {
    pub fn already_satisfied(capability: &str) -> Self {
        Self::new(capability, Outcome::AlreadySatisfied, "already satisfied", 0)
    }

    pub fn installed(capability: &str, detail: impl Into<String>, attempts: u32) -> Self {
        Self::new(capability, Outcome::Installed, detail, attempts)
    }

    pub fn planned(capability: &str, detail: impl Into<String>) -> Self {
        Self::new(capability, Outcome::Planned, detail, 0)
    }

    pub fn failed(capability: &str, detail: impl Into<String>, attempts: u32) -> Self {
        Self::new(capability, Outcome::Failed, detail, attempts)
    }

    fn new(capability: &str, outcome: Outcome, detail: impl Into<String>, attempts: u32) -> Self {
        Self {
            capability: capability.to_string(),
            outcome,
            detail: detail.into(),
            attempts,
            failed_prerequisites: Vec::new(),
        }
    }

    /// Record failed prerequisites.
    pub fn with_failed_prerequisites(mut self, failed: Vec<String>) -> Self {
        self.failed_prerequisites = failed;
        self
    }

    pub fn is_failed(&self) -> bool {
        self.outcome == Outcome::Failed
    }
}

/// Accumulates results while the engine runs.
#[derive(Debug, Clone)]
pub struct RunReport {
    platform: Platform,
    results: Vec<ProvisionResult>,
    started_at: DateTime<Utc>,
    interrupted: bool,
}

impl RunReport {
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            results: Vec::new(),
            started_at: Utc::now(),
            interrupted: false,
        }
    }

    /// Append a result. Results are never modified after this.
    pub fn push(&mut self, result: ProvisionResult) {
        self.results.push(result);
    }

    pub fn mark_interrupted(&mut self) {
        self.interrupted = true;
    }

    pub fn results(&self) -> &[ProvisionResult] {
        &self.results
    }

    pub fn get(&self, capability: &str) -> Option<&ProvisionResult> {
        self.results.iter().find(|r| r.capability == capability)
    }

    pub fn is_interrupted(&self) -> bool {
        self.interrupted
    }

    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    /// Seal the report. Only the verifier calls this.
    pub(crate) fn seal(
        self,
        verification: Vec<Verification>,
        remediation: Vec<Remediation>,
    ) -> SealedReport {
        let overall = if !self.interrupted && verification.iter().all(|v| v.status.is_satisfied()) {
            Overall::Success
        } else {
            Overall::PartialFailure
        };

        SealedReport {
            overall,
            platform: self.platform,
            results: self.results,
            verification,
            remediation,
            interrupted: self.interrupted,
            started_at: self.started_at,
            finished_at: Utc::now(),
        }
    }
}

/// Final verdict of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Overall {
    Success,
    PartialFailure,
}

/// Post-run probe of one capability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verification {
    pub capability: String,
    #[serde(flatten)]
    pub status: ProbeStatus,
}

/// What a person should do about a failed capability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Remediation {
    pub capability: String,
    pub text: String,
}

/// A capability the summary has to name.
#[derive(Debug, Clone, Copy)]
pub struct Attention<'a> {
    pub capability: &'a str,
    /// Provisioning result, absent when the capability never ran.
    pub result: Option<&'a ProvisionResult>,
    /// Verification status when it did not pass.
    pub status: Option<&'a ProbeStatus>,
}

/// Read-only, verified report handed to the reporter.
#[derive(Debug, Clone, Serialize)]
pub struct SealedReport {
    overall: Overall,
    platform: Platform,
    results: Vec<ProvisionResult>,
    verification: Vec<Verification>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    remediation: Vec<Remediation>,
    interrupted: bool,
    started_at: DateTime<Utc>,
    finished_at: DateTime<Utc>,
}

impl SealedReport {
    pub fn overall(&self) -> Overall {
        self.overall
    }

    pub fn is_success(&self) -> bool {
        self.overall == Overall::Success
    }

    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    pub fn results(&self) -> &[ProvisionResult] {
        &self.results
    }

    pub fn verification(&self) -> &[Verification] {
        &self.verification
    }

    pub fn verification_of(&self, capability: &str) -> Option<&ProbeStatus> {
        self.verification
            .iter()
            .find(|v| v.capability == capability)
            .map(|v| &v.status)
    }

    /// Remediation text for a capability, if it has one.
    pub fn remediation_of(&self, capability: &str) -> Option<&str> {
        self.remediation
            .iter()
            .find(|r| r.capability == capability)
            .map(|r| r.text.as_str())
    }

    pub fn is_interrupted(&self) -> bool {
        self.interrupted
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn finished_at(&self) -> DateTime<Utc> {
        self.finished_at
    }

    /// Capabilities whose provisioning failed.
    pub fn failed(&self) -> impl Iterator<Item = &ProvisionResult> {
        self.results.iter().filter(|r| r.is_failed())
    }

    /// Every capability left unsatisfied, in run order: failed results and
    /// results that did not verify, then capabilities that never ran but
    /// failed verification.
    ///
    /// Planned (dry-run) results are expected to be unsatisfied and are
    /// not included.
    pub fn needs_attention(&self) -> Vec<Attention<'_>> {
        let mut items: Vec<Attention<'_>> = Vec::new();
        for result in &self.results {
            let status = self
                .verification_of(&result.capability)
                .filter(|s| !s.is_satisfied());
            if result.is_failed() || (result.outcome != Outcome::Planned && status.is_some()) {
                items.push(Attention {
                    capability: &result.capability,
                    result: Some(result),
                    status,
                });
            }
        }
        for v in &self.verification {
            let seen = self.results.iter().any(|r| r.capability == v.capability);
            if !seen && !v.status.is_satisfied() {
                items.push(Attention {
                    capability: &v.capability,
                    result: None,
                    status: Some(&v.status),
                });
            }
        }
        items
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
