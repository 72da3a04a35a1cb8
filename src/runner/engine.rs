//! Provisioning engine.
//!
//! Walks the registry in resolved order and hands each capability to the
//! installer, strictly one at a time. A failed capability never stops the
//! run: its dependents are still attempted and carry the failed
//! prerequisites on their results.

use crate::capabilities::installer::{Installer, INTERRUPTED};
use crate::capabilities::{CapabilityRegistry, Platform};
use crate::error::Result;
use crate::report::{ProvisionResult, RunReport};
use crate::runner::CancelFlag;

/// Progress events emitted during a run.
#[derive(Debug, Clone, Copy)]
pub enum ProvisionEvent<'a> {
    /// A capability is about to be probed and, if needed, installed.
    Starting {
        name: &'a str,
        index: usize,
        total: usize,
    },
    /// The installer is waiting between attempts or readiness polls.
    Waiting { name: &'a str, message: &'a str },
    /// A capability finished.
    Finished { result: &'a ProvisionResult },
}

/// Drives probe and installer over every capability.
pub struct ProvisioningEngine<'a> {
    installer: &'a Installer<'a>,
    cancel: &'a CancelFlag,
}

impl<'a> ProvisioningEngine<'a> {
    pub fn new(installer: &'a Installer<'a>, cancel: &'a CancelFlag) -> Self {
        Self { installer, cancel }
    }

    /// Provision every capability.
    pub fn run(&self, registry: &CapabilityRegistry, platform: &Platform) -> Result<RunReport> {
        self.run_with_progress(registry, platform, |_| {})
    }

    /// Provision every capability, reporting progress.
    ///
    /// Only fails if the install order cannot be resolved, which happens
    /// before anything is installed.
    pub fn run_with_progress(
        &self,
        registry: &CapabilityRegistry,
        platform: &Platform,
        mut on_progress: impl FnMut(ProvisionEvent<'_>),
    ) -> Result<RunReport> {
        let order = registry.resolve_order()?;
        let total = order.len();
        let mut report = RunReport::new(platform.clone());

        tracing::info!("Provisioning {} capabilities", total);

        for (index, capability) in order.into_iter().enumerate() {
            if self.cancel.is_cancelled() {
                tracing::warn!(
                    "Interrupted; {} capabilities not attempted",
                    total - index
                );
                report.mark_interrupted();
                break;
            }

            on_progress(ProvisionEvent::Starting {
                name: &capability.name,
                index,
                total,
            });

            let failed_prerequisites = failed_prerequisites(registry, &report, &capability.name);
            if !failed_prerequisites.is_empty() {
                tracing::warn!(
                    "{}: prerequisite(s) failed ({}), attempting anyway",
                    capability.name,
                    failed_prerequisites.join(", ")
                );
            }

            let result = self
                .installer
                .install(capability, platform, &mut |message| {
                    on_progress(ProvisionEvent::Waiting {
                        name: &capability.name,
                        message,
                    })
                })
                .with_failed_prerequisites(failed_prerequisites);

            let interrupted = result.is_failed() && result.detail == INTERRUPTED;
            on_progress(ProvisionEvent::Finished { result: &result });
            report.push(result);

            if interrupted {
                report.mark_interrupted();
                break;
            }
        }

        Ok(report)
    }
}

/// Failed transitive prerequisites of `name`, in the order they ran.
fn failed_prerequisites(
    registry: &CapabilityRegistry,
    report: &RunReport,
    name: &str,
) -> Vec<String> {
    let prerequisites = registry.graph().transitive_prerequisites(name);
    report
        .results()
        .iter()
        .filter(|r| r.is_failed() && prerequisites.contains(&r.capability))
        .map(|r| r.capability.clone())
        .collect()
}
