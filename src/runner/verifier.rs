//! Post-run verification.

use crate::capabilities::{CapabilityRegistry, Probe};
use crate::report::{Outcome, Remediation, RunReport, SealedReport, Verification};

/// Re-probes every capability and seals the report.
pub struct Verifier<'a> {
    probe: &'a dyn Probe,
}

impl<'a> Verifier<'a> {
    pub fn new(probe: &'a dyn Probe) -> Self {
        Self { probe }
    }

    /// Seal the report with a fresh probe of every capability.
    ///
    /// Provisioning results are never reused as verification. An
    /// interrupted run is sealed without probing and is never a success.
    pub fn verify(&self, report: RunReport, registry: &CapabilityRegistry) -> SealedReport {
        let capabilities = registry
            .resolve_order()
            .unwrap_or_else(|_| registry.capabilities().iter().collect());

        let verification: Vec<Verification> = if report.is_interrupted() {
            tracing::debug!("Run was interrupted; skipping verification");
            Vec::new()
        } else {
            capabilities
                .iter()
                .map(|cap| Verification {
                    capability: cap.name.clone(),
                    status: self.probe.detect(cap),
                })
                .collect()
        };

        for v in &verification {
            let installed = report
                .get(&v.capability)
                .is_some_and(|r| r.outcome == Outcome::Installed);
            if installed && !v.status.is_satisfied() {
                tracing::warn!(
                    "{} was installed but does not verify: {}",
                    v.capability,
                    v.status
                );
            }
        }

        let remediation = capabilities
            .iter()
            .filter(|cap| {
                let failed = report.get(&cap.name).is_some_and(|r| r.is_failed());
                let unverified = verification
                    .iter()
                    .any(|v| v.capability == cap.name && !v.status.is_satisfied());
                failed || unverified
            })
            .map(|cap| Remediation {
                capability: cap.name.clone(),
                text: cap.remediation_text(),
            })
            .collect();

        report.seal(verification, remediation)
    }
}
