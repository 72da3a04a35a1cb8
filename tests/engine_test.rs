//! End-to-end provisioning against a simulated host.
//!
//! The host keeps installed tools, running services and profile lines in
//! memory and implements the probe and every backend, so a whole run
//! (engine, verifier, reporter) is exercised without touching the machine.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::time::Duration;

use kitup::backends::{PackageManager, ServiceRuntime, ShellProfile};
use kitup::capabilities::registry::shell_exports;
use kitup::capabilities::{
    Action, Arch, Capability, CapabilityRegistry, Detect, Installer, InstallerContext, OsFamily,
    Platform, Probe, ProbeStatus, RetryPolicy,
};
use kitup::report::render::exit_code;
use kitup::report::{Outcome, Overall, Reporter, SealedReport};
use kitup::runner::{CancelFlag, ProvisionEvent, ProvisioningEngine, Verifier};
use kitup::ui::MockUI;
use kitup::{KitupError, Result};

fn platform() -> Platform {
    Platform::new(OsFamily::MacOs, Arch::Arm64)
}

/// In-memory host.
#[derive(Default)]
struct Host {
    tools: RefCell<HashMap<String, String>>,
    packages: RefCell<HashSet<String>>,
    running: RefCell<HashSet<String>>,
    profile: RefCell<Vec<String>>,
    mutations: RefCell<Vec<String>>,
    sleeps: RefCell<Vec<Duration>>,
    /// package -> (tool, version) it provides
    package_tools: HashMap<String, (String, String)>,
    /// shell command -> (tool, version) it provides
    command_tools: HashMap<String, (String, String)>,
    /// shell command -> failures left before it starts succeeding
    command_failures: RefCell<HashMap<String, u32>>,
    failing_packages: HashSet<String>,
    /// start command -> (check, polls before ready)
    service_starts: HashMap<String, (String, u32)>,
    pending_services: RefCell<HashMap<String, u32>>,
}

impl Host {
    fn with_tool(self, tool: &str, version: &str) -> Self {
        self.tools
            .borrow_mut()
            .insert(tool.to_string(), version.to_string());
        self
    }

    fn with_package(mut self, package: &str, tool: &str, version: &str) -> Self {
        self.package_tools
            .insert(package.to_string(), (tool.to_string(), version.to_string()));
        self
    }

    fn with_command(mut self, command: &str, tool: &str, version: &str) -> Self {
        self.command_tools
            .insert(command.to_string(), (tool.to_string(), version.to_string()));
        self
    }

    fn failing_command(self, command: &str, failures: u32) -> Self {
        self.command_failures
            .borrow_mut()
            .insert(command.to_string(), failures);
        self
    }

    fn failing_package(mut self, package: &str) -> Self {
        self.failing_packages.insert(package.to_string());
        self
    }

    fn with_service(mut self, start: &str, check: &str, polls: u32) -> Self {
        self.service_starts
            .insert(start.to_string(), (check.to_string(), polls));
        self
    }

    fn run_shell(&self, command: &str) -> bool {
        self.mutations.borrow_mut().push(format!("sh {}", command));
        if let Some(left) = self.command_failures.borrow_mut().get_mut(command) {
            if *left > 0 {
                *left -= 1;
                return false;
            }
        }
        if let Some((tool, version)) = self.command_tools.get(command) {
            self.tools.borrow_mut().insert(tool.clone(), version.clone());
        }
        true
    }

    fn mutation_count(&self) -> usize {
        self.mutations.borrow().len()
    }
}

impl Probe for Host {
    fn detect(&self, capability: &Capability) -> ProbeStatus {
        match &capability.detect {
            Detect::Command { name, version } => match self.tools.borrow().get(name) {
                None => ProbeStatus::missing(format!("{} not found", name)),
                Some(found) => match version {
                    Some(required) if !found.starts_with(required.as_str()) => {
                        ProbeStatus::WrongVersion {
                            found: found.clone(),
                            required: required.clone(),
                        }
                    }
                    _ => ProbeStatus::Satisfied,
                },
            },
            Detect::Service { check } => {
                if self.running.borrow().contains(check) {
                    ProbeStatus::Satisfied
                } else {
                    ProbeStatus::service_down("not running")
                }
            }
            Detect::Profile { lines } => {
                let profile = self.profile.borrow();
                if lines.iter().all(|l| profile.contains(l)) {
                    ProbeStatus::Satisfied
                } else {
                    ProbeStatus::missing("profile lines absent")
                }
            }
            Detect::Http { .. } | Detect::File { .. } => ProbeStatus::missing("not simulated"),
        }
    }
}

impl PackageManager for Host {
    fn is_installed(&self, package: &str) -> bool {
        self.packages.borrow().contains(package)
    }

    fn install(&self, package: &str, _cask: bool) -> Result<()> {
        self.mutations
            .borrow_mut()
            .push(format!("install {}", package));
        if self.failing_packages.contains(package) {
            return Err(KitupError::CommandFailed {
                command: format!("brew install {}", package),
                code: Some(1),
            });
        }
        self.packages.borrow_mut().insert(package.to_string());
        if let Some((tool, version)) = self.package_tools.get(package) {
            self.tools.borrow_mut().insert(tool.clone(), version.clone());
        }
        Ok(())
    }

    fn link(&self, package: &str) -> Result<()> {
        self.mutations.borrow_mut().push(format!("link {}", package));
        if let Some((tool, version)) = self.package_tools.get(package) {
            self.tools.borrow_mut().insert(tool.clone(), version.clone());
        }
        Ok(())
    }
}

impl ServiceRuntime for Host {
    fn is_running(&self, check: &str) -> bool {
        if self.running.borrow().contains(check) {
            return true;
        }
        let mut pending = self.pending_services.borrow_mut();
        match pending.get_mut(check) {
            Some(0) => {
                pending.remove(check);
                self.running.borrow_mut().insert(check.to_string());
                true
            }
            Some(left) => {
                *left -= 1;
                false
            }
            None => false,
        }
    }

    fn start(&self, start: &str) -> Result<()> {
        self.mutations.borrow_mut().push(format!("start {}", start));
        if let Some((check, polls)) = self.service_starts.get(start) {
            self.pending_services
                .borrow_mut()
                .insert(check.clone(), *polls);
        }
        Ok(())
    }
}

impl ShellProfile for Host {
    fn contains(&self, line: &str) -> bool {
        self.profile.borrow().iter().any(|l| l == line)
    }

    fn append(&self, line: &str) -> Result<()> {
        if !self.contains(line) {
            self.mutations.borrow_mut().push(format!("append {}", line));
            self.profile.borrow_mut().push(line.to_string());
        }
        Ok(())
    }
}

const UV_INSTALL: &str = "curl -LsSf https://astral.sh/uv/install.sh | sh";

fn git() -> Capability {
    Capability::new(
        "git",
        Detect::Command {
            name: "git".into(),
            version: None,
        },
        Action::Package {
            name: "git".into(),
            version: None,
            cask: false,
            link: false,
        },
    )
}

fn python311() -> Capability {
    Capability::new(
        "python311",
        Detect::Command {
            name: "python3.11".into(),
            version: Some("3.11".into()),
        },
        Action::Package {
            name: "python".into(),
            version: Some("3.11".into()),
            cask: false,
            link: true,
        },
    )
    .retry(RetryPolicy::new(3, 2))
}

fn uv() -> Capability {
    Capability::new(
        "uv",
        Detect::Command {
            name: "uv".into(),
            version: None,
        },
        Action::Shell {
            command: UV_INSTALL.into(),
        },
    )
    .requires(["python311"])
}

fn docker_daemon() -> Capability {
    Capability::new(
        "docker-daemon",
        Detect::Service {
            check: "docker info".into(),
        },
        Action::Service {
            start: "open -a Docker".into(),
            check: "docker info".into(),
            wait: RetryPolicy::service_wait(),
        },
    )
}

fn python_stack() -> CapabilityRegistry {
    CapabilityRegistry::new(vec![git(), python311(), uv()]).unwrap()
}

fn fresh_host() -> Host {
    Host::default()
        .with_package("git", "git", "2.44.0")
        .with_package("python@3.11", "python3.11", "3.11.9")
        .with_command(UV_INSTALL, "uv", "0.4.0")
}

fn provision_with(host: &Host, registry: &CapabilityRegistry, cancel: &CancelFlag) -> SealedReport {
    let run_command = |cmd: &str| host.run_shell(cmd);
    let sleep = |d: Duration| {
        host.sleeps.borrow_mut().push(d);
        !cancel.is_cancelled()
    };
    let installer = Installer::new(
        host,
        InstallerContext {
            packages: host,
            services: host,
            profile: host,
            run_command: &run_command,
            sleep: &sleep,
            cancel,
        },
    );
    let engine = ProvisioningEngine::new(&installer, cancel);
    let report = engine.run(registry, &platform()).unwrap();
    Verifier::new(host).verify(report, registry)
}

fn provision(host: &Host, registry: &CapabilityRegistry) -> SealedReport {
    provision_with(host, registry, &CancelFlag::new())
}

fn outcomes(report: &SealedReport) -> Vec<(String, Outcome)> {
    report
        .results()
        .iter()
        .map(|r| (r.capability.clone(), r.outcome))
        .collect()
}

#[test]
fn fresh_host_installs_everything_in_order() {
    let host = fresh_host();
    let report = provision(&host, &python_stack());

    assert_eq!(
        outcomes(&report),
        vec![
            ("git".to_string(), Outcome::Installed),
            ("python311".to_string(), Outcome::Installed),
            ("uv".to_string(), Outcome::Installed),
        ]
    );
    assert_eq!(report.overall(), Overall::Success);
    assert_eq!(exit_code(&report), 0);
}

#[test]
fn second_run_changes_nothing() {
    let host = fresh_host();
    provision(&host, &python_stack());
    let mutations_after_first = host.mutation_count();

    let report = provision(&host, &python_stack());

    assert!(report
        .results()
        .iter()
        .all(|r| r.outcome == Outcome::AlreadySatisfied));
    assert_eq!(host.mutation_count(), mutations_after_first);
    assert!(report.is_success());
}

#[test]
fn identical_hosts_give_identical_runs() {
    let registry = python_stack();
    let first = outcomes(&provision(&fresh_host(), &registry));
    let second = outcomes(&provision(&fresh_host(), &registry));
    assert_eq!(first, second);

    let order = |r: &CapabilityRegistry| -> Vec<String> {
        r.resolve_order()
            .unwrap()
            .iter()
            .map(|c| c.name.clone())
            .collect()
    };
    assert_eq!(order(&registry), order(&registry));
}

#[test]
fn cycle_is_rejected_before_any_install() {
    let a = git().requires(["b"]);
    let mut b = uv();
    b.name = "b".into();
    b.prerequisites = vec!["git".into()];

    let result = CapabilityRegistry::new(vec![a, b]);
    match result {
        Err(KitupError::CircularDependency { cycle }) => {
            assert!(cycle.contains("git"));
            assert!(cycle.contains("b"));
        }
        other => panic!("expected cycle error, got {:?}", other.map(|r| r.len())),
    }
}

#[test]
fn failed_python_still_attempts_uv() {
    let host = fresh_host().failing_package("python@3.11");
    let registry = python_stack();

    let report = provision(&host, &registry);

    let python = report.results().iter().find(|r| r.capability == "python311").unwrap();
    assert_eq!(python.outcome, Outcome::Failed);
    assert_eq!(python.attempts, 3);

    let uv = report.results().iter().find(|r| r.capability == "uv").unwrap();
    assert_eq!(uv.outcome, Outcome::Installed);
    assert_eq!(uv.failed_prerequisites, vec!["python311"]);

    let git = report.results().iter().find(|r| r.capability == "git").unwrap();
    assert_eq!(git.outcome, Outcome::Installed);

    assert_eq!(report.overall(), Overall::PartialFailure);
    assert_ne!(exit_code(&report), 0);

    let mut ui = MockUI::new();
    let code = Reporter::new(&mut ui).render(&report);
    assert_eq!(code, 1);
    assert!(ui.has_error("python311 failed"));
    assert!(ui.has_hint("brew install python@3.11"));
    assert!(ui.has_hint("after failed prerequisite(s): python311"));
}

#[test]
fn failing_service_is_contained() {
    let host = fresh_host();
    let registry = CapabilityRegistry::new(vec![docker_daemon(), git()]).unwrap();

    let report = provision(&host, &registry);

    assert_eq!(
        outcomes(&report),
        vec![
            ("docker-daemon".to_string(), Outcome::Failed),
            ("git".to_string(), Outcome::Installed),
        ]
    );
    assert_eq!(report.overall(), Overall::PartialFailure);
    let failed: Vec<_> = report.failed().map(|r| r.capability.as_str()).collect();
    assert_eq!(failed, vec!["docker-daemon"]);
    // 30 readiness checks, a pause between each.
    assert_eq!(host.sleeps.borrow().len(), 29);
}

#[test]
fn service_becomes_ready_while_polling() {
    let host = fresh_host().with_service("open -a Docker", "docker info", 3);
    let registry = CapabilityRegistry::new(vec![docker_daemon()]).unwrap();

    let report = provision(&host, &registry);

    assert!(report.is_success());
    assert_eq!(host.sleeps.borrow().len(), 3);
    assert_eq!(
        host.mutations.borrow().as_slice(),
        &["start open -a Docker".to_string()]
    );
}

#[test]
fn never_succeeding_action_stops_at_max_attempts() {
    let host = fresh_host()
        .with_tool("python3.11", "3.11.9")
        .failing_command(UV_INSTALL, u32::MAX);
    let mut uv = uv().retry(RetryPolicy::new(30, 2));
    uv.prerequisites.clear();
    let registry = CapabilityRegistry::new(vec![uv]).unwrap();

    let report = provision(&host, &registry);

    let result = &report.results()[0];
    assert_eq!(result.outcome, Outcome::Failed);
    assert_eq!(result.attempts, 30);
    assert_eq!(host.mutation_count(), 30);
    assert_eq!(host.sleeps.borrow().len(), 29);
    assert!(host
        .sleeps
        .borrow()
        .iter()
        .all(|d| *d == Duration::from_secs(2)));
}

#[test]
fn retry_recovers_from_transient_failure() {
    let host = fresh_host()
        .with_tool("python3.11", "3.11.9")
        .failing_command(UV_INSTALL, 2);
    let registry = python_stack();

    let mut uv = uv().retry(RetryPolicy::new(3, 1));
    uv.prerequisites = vec!["python311".into()];
    let registry = registry.with_custom(vec![uv]).unwrap();

    let report = provision(&host, &registry);
    let uv = report.results().iter().find(|r| r.capability == "uv").unwrap();
    assert_eq!(uv.outcome, Outcome::Installed);
    assert_eq!(uv.attempts, 3);
}

#[test]
fn wrong_python_version_is_relinked() {
    let host = fresh_host().with_tool("python3.11", "3.10.4");
    host.packages.borrow_mut().insert("python@3.11".to_string());
    let registry = CapabilityRegistry::new(vec![python311()]).unwrap();

    let report = provision(&host, &registry);

    assert!(report.is_success());
    assert_eq!(
        host.mutations.borrow().as_slice(),
        &["link python@3.11".to_string()]
    );
    assert_eq!(
        host.tools.borrow().get("python3.11").map(String::as_str),
        Some("3.11.9")
    );
}

#[test]
fn interrupt_during_poll_stops_the_run() {
    let host = fresh_host();
    let registry = CapabilityRegistry::new(vec![docker_daemon(), git()]).unwrap();
    let cancel = CancelFlag::new();

    let run_command = |cmd: &str| host.run_shell(cmd);
    let sleep = |_d: Duration| {
        cancel.cancel();
        false
    };
    let installer = Installer::new(
        &host,
        InstallerContext {
            packages: &host,
            services: &host,
            profile: &host,
            run_command: &run_command,
            sleep: &sleep,
            cancel: &cancel,
        },
    );
    let report = ProvisioningEngine::new(&installer, &cancel)
        .run(&registry, &platform())
        .unwrap();
    let sealed = Verifier::new(&host).verify(report, &registry);

    assert!(sealed.is_interrupted());
    assert_eq!(sealed.results().len(), 1);
    assert_eq!(sealed.results()[0].detail, "interrupted");
    assert!(sealed.verification().is_empty());
    assert_eq!(sealed.overall(), Overall::PartialFailure);
}

#[test]
fn progress_events_follow_install_order() {
    let host = fresh_host();
    let registry = python_stack();
    let cancel = CancelFlag::new();
    let run_command = |cmd: &str| host.run_shell(cmd);
    let sleep = |_d: Duration| true;
    let installer = Installer::new(
        &host,
        InstallerContext {
            packages: &host,
            services: &host,
            profile: &host,
            run_command: &run_command,
            sleep: &sleep,
            cancel: &cancel,
        },
    );

    let mut started = Vec::new();
    let mut finished = Vec::new();
    ProvisioningEngine::new(&installer, &cancel)
        .run_with_progress(&registry, &platform(), |event| match event {
            ProvisionEvent::Starting { name, index, total } => {
                assert_eq!(total, 3);
                started.push((index, name.to_string()));
            }
            ProvisionEvent::Finished { result } => finished.push(result.capability.clone()),
            ProvisionEvent::Waiting { .. } => {}
        })
        .unwrap();

    assert_eq!(
        started,
        vec![
            (0, "git".to_string()),
            (1, "python311".to_string()),
            (2, "uv".to_string())
        ]
    );
    assert_eq!(finished, vec!["git", "python311", "uv"]);
}

#[test]
fn builtin_stack_on_a_provisioned_mac_needs_only_the_daemon() {
    let platform = platform();
    let registry = CapabilityRegistry::builtin(&platform).unwrap();
    let host = Host::default()
        .with_tool("brew", "4.3.0")
        .with_tool("git", "2.44.0")
        .with_tool("python3.11", "3.11.9")
        .with_tool("node", "22.1.0")
        .with_tool("uv", "0.4.0")
        .with_tool("docker", "26.1.1")
        .with_tool("supabase", "1.167.4")
        .with_service("open -a Docker", "docker info", 1);
    for line in shell_exports(&platform) {
        host.profile.borrow_mut().push(line);
    }

    let report = provision(&host, &registry);

    let installed: Vec<_> = report
        .results()
        .iter()
        .filter(|r| r.outcome == Outcome::Installed)
        .map(|r| r.capability.as_str())
        .collect();
    assert_eq!(installed, vec!["docker-daemon"]);
    assert!(report.is_success(), "{:?}", outcomes(&report));
}
