//! Idempotent capability installation.
//!
//! Every install is check-then-act: the capability is probed first and no
//! mutating call is made when it is already satisfied. Actions run under a
//! bounded retry policy, and success is judged by re-probing rather than by
//! the action's exit status.

use std::time::Duration;

use crate::backends::{PackageManager, ServiceRuntime, ShellProfile};
use crate::capabilities::platform::Platform;
use crate::capabilities::probe::Probe;
use crate::capabilities::registry::{Action, Capability, RetryPolicy};
use crate::capabilities::status::ProbeStatus;
use crate::report::ProvisionResult;
use crate::runner::CancelFlag;

/// Detail recorded when a run is cancelled mid-install.
pub const INTERRUPTED: &str = "interrupted";

/// Mockable dependencies for the installer.
pub struct InstallerContext<'a> {
    /// Platform package manager.
    pub packages: &'a dyn PackageManager,
    /// Background service control.
    pub services: &'a dyn ServiceRuntime,
    /// Login shell profile.
    pub profile: &'a dyn ShellProfile,
    /// Run a shell command, returning true on success.
    pub run_command: &'a dyn Fn(&str) -> bool,
    /// Wait between attempts. Returns false if the wait was cut short.
    pub sleep: &'a dyn Fn(Duration) -> bool,
    /// Cancellation flag for the run.
    pub cancel: &'a CancelFlag,
}

impl InstallerContext<'_> {
    fn pause(&self, delay: Duration) -> bool {
        !self.cancel.is_cancelled() && (self.sleep)(delay) && !self.cancel.is_cancelled()
    }
}

/// Installs or repairs one capability at a time.
pub struct Installer<'a> {
    probe: &'a dyn Probe,
    ctx: InstallerContext<'a>,
    default_retry: RetryPolicy,
    dry_run: bool,
}

impl<'a> Installer<'a> {
    pub fn new(probe: &'a dyn Probe, ctx: InstallerContext<'a>) -> Self {
        Self {
            probe,
            ctx,
            default_retry: RetryPolicy::single(),
            dry_run: false,
        }
    }

    /// Retry policy for capabilities that do not set their own.
    pub fn default_retry(mut self, policy: RetryPolicy) -> Self {
        self.default_retry = policy;
        self
    }

    /// Never run actions; report what would run instead.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Bring one capability to the satisfied state.
    ///
    /// `on_wait` receives a short message whenever the installer is about to
    /// wait (between retries or readiness polls).
    pub fn install(
        &self,
        capability: &Capability,
        platform: &Platform,
        on_wait: &mut dyn FnMut(&str),
    ) -> ProvisionResult {
        let status = self.probe.detect(capability);
        if status.is_satisfied() {
            return ProvisionResult::already_satisfied(&capability.name);
        }

        if self.ctx.cancel.is_cancelled() {
            return ProvisionResult::failed(&capability.name, INTERRUPTED, 0);
        }

        if self.dry_run {
            return ProvisionResult::planned(
                &capability.name,
                format!(
                    "{}; would run: {}",
                    status,
                    capability.install.preview(platform)
                ),
            );
        }

        tracing::info!("Provisioning {} ({})", capability.name, status);

        match &capability.install {
            Action::Manual => ProvisionResult::failed(
                &capability.name,
                format!("{}; requires manual installation", status),
                0,
            ),
            Action::Service { start, check, wait } => {
                self.start_service(capability, start, check, *wait, on_wait)
            }
            action => self.retry_action(capability, action, &status, on_wait),
        }
    }

    fn retry_action(
        &self,
        capability: &Capability,
        action: &Action,
        initial: &ProbeStatus,
        on_wait: &mut dyn FnMut(&str),
    ) -> ProvisionResult {
        let policy = capability.retry.unwrap_or(self.default_retry);
        let max = policy.attempts();
        let mut last_detail = initial.to_string();

        for attempt in 1..=max {
            if self.ctx.cancel.is_cancelled() {
                return ProvisionResult::failed(&capability.name, INTERRUPTED, attempt - 1);
            }

            tracing::debug!("{}: attempt {}/{}", capability.name, attempt, max);
            match self.run_action(action, initial) {
                Ok(()) => {
                    let status = self.probe.detect(capability);
                    if status.is_satisfied() {
                        return ProvisionResult::installed(
                            &capability.name,
                            format!("installed ({})", action.describe()),
                            attempt,
                        );
                    }
                    last_detail = format!("action completed but capability is {}", status);
                }
                Err(detail) => last_detail = detail,
            }
            tracing::warn!(
                "{}: attempt {}/{} failed: {}",
                capability.name,
                attempt,
                max,
                last_detail
            );

            if attempt < max {
                on_wait(&format!(
                    "retrying {} in {}s (attempt {}/{})",
                    capability.name,
                    policy.delay_secs,
                    attempt + 1,
                    max
                ));
                if !self.ctx.pause(policy.delay()) {
                    return ProvisionResult::failed(&capability.name, INTERRUPTED, attempt);
                }
            }
        }

        ProvisionResult::failed(
            &capability.name,
            format!("gave up after {} attempt(s): {}", max, last_detail),
            max,
        )
    }

    fn run_action(&self, action: &Action, status: &ProbeStatus) -> Result<(), String> {
        match action {
            Action::Package {
                name,
                version,
                cask,
                link,
            } => {
                let package = Action::package_ref(name, version.as_deref());
                if !self.ctx.packages.is_installed(&package) {
                    self.ctx
                        .packages
                        .install(&package, *cask)
                        .map_err(|e| e.to_string())?;
                }
                if *link || matches!(status, ProbeStatus::WrongVersion { .. }) {
                    self.ctx.packages.link(&package).map_err(|e| e.to_string())?;
                }
                Ok(())
            }
            Action::Shell { command } => {
                if (self.ctx.run_command)(command) {
                    Ok(())
                } else {
                    Err(format!("`{}` failed", command))
                }
            }
            Action::Profile { lines } => {
                for line in lines {
                    self.ctx.profile.append(line).map_err(|e| e.to_string())?;
                }
                Ok(())
            }
            Action::Service { .. } | Action::Manual => {
                Err("action cannot be retried".to_string())
            }
        }
    }

    fn start_service(
        &self,
        capability: &Capability,
        start: &str,
        check: &str,
        wait: RetryPolicy,
        on_wait: &mut dyn FnMut(&str),
    ) -> ProvisionResult {
        if let Err(e) = self.ctx.services.start(start) {
            return ProvisionResult::failed(
                &capability.name,
                format!("could not start: {}", e),
                1,
            );
        }

        let max = wait.attempts();
        for poll in 1..=max {
            if self.ctx.services.is_running(check) {
                let status = self.probe.detect(capability);
                if status.is_satisfied() {
                    return ProvisionResult::installed(
                        &capability.name,
                        format!("started ({}), ready after {} check(s)", start, poll),
                        1,
                    );
                }
            }

            if poll < max {
                on_wait(&format!(
                    "waiting for {} to become ready ({}/{})",
                    capability.name, poll, max
                ));
                if !self.ctx.pause(wait.delay()) {
                    return ProvisionResult::failed(&capability.name, INTERRUPTED, 1);
                }
            }
        }

        ProvisionResult::failed(
            &capability.name,
            format!(
                "not ready after {} check(s) over {}s",
                max,
                u64::from(max.saturating_sub(1)) * wait.delay_secs
            ),
            1,
        )
    }
}
