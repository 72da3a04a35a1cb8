//! Capability registry and definitions.
//!
//! Defines what capabilities exist, how to detect them and how to install
//! them. The registry holds the built-in developer stack and any project
//! capabilities from config, in declaration order.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::capabilities::graph::DependencyGraph;
use crate::capabilities::platform::{OsFamily, Platform};
use crate::error::Result;

/// Bounded retry or poll policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Maximum number of attempts (at least one is always made).
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Fixed delay between attempts, in seconds.
    #[serde(default = "default_delay_secs")]
    pub delay_secs: u64,
}

fn default_max_attempts() -> u32 {
    1
}

fn default_delay_secs() -> u64 {
    2
}

impl RetryPolicy {
    /// Create a policy.
    pub fn new(max_attempts: u32, delay_secs: u64) -> Self {
        Self {
            max_attempts,
            delay_secs,
        }
    }

    /// Default policy for install actions: a single attempt.
    pub fn single() -> Self {
        Self::new(1, default_delay_secs())
    }

    /// Default readiness poll for background services: 30 × 2 s.
    pub fn service_wait() -> Self {
        Self::new(30, 2)
    }

    /// Number of attempts, never less than one.
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Delay between attempts.
    pub fn delay(&self) -> Duration {
        Duration::from_secs(self.delay_secs)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::single()
    }
}

/// How to tell whether a capability is satisfied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Detect {
    /// An executable is resolvable, optionally at a required version.
    Command {
        /// Executable name (e.g. `python3.11`).
        name: String,
        /// Required version prefix (e.g. `3.11`).
        #[serde(default, skip_serializing_if = "Option::is_none")]
        version: Option<String>,
    },

    /// A readiness command exits 0 (e.g. `docker info`).
    Service {
        /// Readiness check command.
        check: String,
    },

    /// An HTTP endpoint answers with a 2xx status.
    Http {
        /// URL to request.
        url: String,
    },

    /// A file or directory exists.
    File {
        /// Path (`~` expanded, relative paths resolve against the project root).
        path: String,
    },

    /// The shell profile contains every line.
    Profile {
        /// Lines that must be present.
        lines: Vec<String>,
    },
}

/// How to install or repair a capability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    /// Install through the platform package manager.
    Package {
        /// Package name (e.g. `python`).
        name: String,
        /// Version suffix (`python@3.11`).
        #[serde(default, skip_serializing_if = "Option::is_none")]
        version: Option<String>,
        /// Install as a cask (GUI application).
        #[serde(default)]
        cask: bool,
        /// Relink the versioned package after install.
        #[serde(default)]
        link: bool,
    },

    /// Run a shell command.
    Shell {
        /// Command to run.
        command: String,
    },

    /// Start a background service and wait until it is ready.
    Service {
        /// Start command.
        start: String,
        /// Readiness check command.
        check: String,
        /// Readiness poll bounds.
        #[serde(default = "RetryPolicy::service_wait")]
        wait: RetryPolicy,
    },

    /// Append lines to the shell profile (only the ones not yet present).
    Profile {
        /// Lines to ensure.
        lines: Vec<String>,
    },

    /// Nothing can be automated; the user has to act.
    Manual,
}

impl Action {
    /// Package reference including the version suffix.
    pub fn package_ref(name: &str, version: Option<&str>) -> String {
        match version {
            Some(v) => format!("{}@{}", name, v),
            None => name.to_string(),
        }
    }

    /// Short description of what the action does, for previews and hints.
    pub fn describe(&self) -> String {
        match self {
            Action::Package {
                name,
                version,
                cask,
                ..
            } => {
                let reference = Self::package_ref(name, version.as_deref());
                if *cask {
                    format!("brew install --cask {}", reference)
                } else {
                    format!("brew install {}", reference)
                }
            }
            Action::Shell { command } => command.clone(),
            Action::Service { start, .. } => start.clone(),
            Action::Profile { lines } => {
                format!("append {} line(s) to the shell profile", lines.len())
            }
            Action::Manual => "manual installation".to_string(),
        }
    }

    /// The concrete command line this action would run on `platform`.
    pub fn preview(&self, platform: &Platform) -> String {
        match self {
            Action::Package {
                name,
                version,
                cask,
                link,
            } => {
                let brew = platform.package_root.join("bin").join("brew");
                let reference = Self::package_ref(name, version.as_deref());
                let mut line = if *cask {
                    format!("{} install --cask {}", brew.display(), reference)
                } else {
                    format!("{} install {}", brew.display(), reference)
                };
                if *link {
                    line.push_str(&format!(
                        " && {} link --overwrite --force {}",
                        brew.display(),
                        reference
                    ));
                }
                line
            }
            Action::Service { start, check, wait } => format!(
                "{} (then poll `{}` up to {} times)",
                start,
                check,
                wait.attempts()
            ),
            other => other.describe(),
        }
    }
}

/// A named, independently verifiable unit of environment setup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capability {
    /// Unique name (e.g. `python311`).
    pub name: String,
    /// Detection probe.
    pub detect: Detect,
    /// Install or repair action.
    pub install: Action,
    /// Capabilities that should be provisioned first.
    #[serde(default, rename = "requires")]
    pub prerequisites: Vec<String>,
    /// What a person should do if provisioning fails.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remediation: Option<String>,
    /// Attempts for the install action.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry: Option<RetryPolicy>,
}

impl Capability {
    /// Create a capability without prerequisites.
    pub fn new(name: impl Into<String>, detect: Detect, install: Action) -> Self {
        Self {
            name: name.into(),
            detect,
            install,
            prerequisites: Vec::new(),
            remediation: None,
            retry: None,
        }
    }

    /// Builder: set prerequisites.
    pub fn requires<I, S>(mut self, prerequisites: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.prerequisites = prerequisites.into_iter().map(Into::into).collect();
        self
    }

    /// Builder: set remediation text.
    pub fn remediation(mut self, text: impl Into<String>) -> Self {
        self.remediation = Some(text.into());
        self
    }

    /// Builder: set the install retry policy.
    pub fn retry(mut self, policy: RetryPolicy) -> Self {
        self.retry = Some(policy);
        self
    }

    /// Remediation shown when this capability fails.
    ///
    /// Falls back to a hint derived from the install action so a failure
    /// always comes with a next step.
    pub fn remediation_text(&self) -> String {
        if let Some(text) = &self.remediation {
            return text.clone();
        }
        match &self.install {
            Action::Package { .. } | Action::Shell { .. } => {
                format!("Install {} manually: {}", self.name, self.install.describe())
            }
            Action::Service { start, .. } => {
                format!("Start {} manually ({}) and re-run kitup", self.name, start)
            }
            Action::Profile { lines } => format!(
                "Add these lines to your shell profile:\n{}",
                lines
                    .iter()
                    .map(|l| format!("  {}", l))
                    .collect::<Vec<_>>()
                    .join("\n")
            ),
            Action::Manual => format!("Install {} manually and re-run kitup", self.name),
        }
    }
}

/// Registry of all capabilities of a provisioning run.
#[derive(Debug, Clone)]
pub struct CapabilityRegistry {
    capabilities: Vec<Capability>,
    graph: DependencyGraph,
}

impl CapabilityRegistry {
    /// Create a registry, validating names, prerequisites and acyclicity.
    pub fn new(capabilities: Vec<Capability>) -> Result<Self> {
        let graph = capabilities
            .iter()
            .fold(DependencyGraph::builder(), |builder, cap| {
                builder.add_node(cap.name.clone(), cap.prerequisites.clone())
            })
            .build()?;

        // Reject cycles at construction time so no run can start with one.
        graph.topological_order()?;

        Ok(Self {
            capabilities,
            graph,
        })
    }

    /// The built-in developer stack for a platform.
    pub fn builtin(platform: &Platform) -> Result<Self> {
        Self::new(builtin_capabilities(platform))
    }

    /// Replace capabilities by name in place and append new ones.
    pub fn with_custom(self, custom: Vec<Capability>) -> Result<Self> {
        let mut capabilities = self.capabilities;
        for cap in custom {
            match capabilities.iter_mut().find(|c| c.name == cap.name) {
                Some(existing) => *existing = cap,
                None => capabilities.push(cap),
            }
        }
        Self::new(capabilities)
    }

    /// Capabilities in topological order, ties broken by declaration order.
    pub fn resolve_order(&self) -> Result<Vec<&Capability>> {
        let names = self.graph.topological_order()?;
        Ok(names
            .iter()
            .filter_map(|name| self.get(name))
            .collect())
    }

    /// Look up a capability by name.
    pub fn get(&self, name: &str) -> Option<&Capability> {
        self.capabilities.iter().find(|c| c.name == name)
    }

    /// All capabilities in declaration order.
    pub fn capabilities(&self) -> &[Capability] {
        &self.capabilities
    }

    /// The prerequisite graph.
    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    /// Number of capabilities.
    pub fn len(&self) -> usize {
        self.capabilities.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.capabilities.is_empty()
    }
}

/// Lines exported to the shell profile for this platform.
pub fn shell_exports(platform: &Platform) -> Vec<String> {
    vec![
        format!(
            "eval \"$({}/bin/brew shellenv)\"",
            platform.package_root.display()
        ),
        format!(
            "export DOCKER_DEFAULT_PLATFORM={}",
            platform.container_platform()
        ),
    ]
}

fn builtin_capabilities(platform: &Platform) -> Vec<Capability> {
    let docker_start = match platform.os_family {
        OsFamily::MacOs => "open -a Docker",
        OsFamily::Other => "systemctl --user start docker-desktop",
    };
    let exports = shell_exports(platform);

    vec![
        Capability::new(
            "brew",
            Detect::Command {
                name: "brew".to_string(),
                version: None,
            },
            Action::Shell {
                command: "NONINTERACTIVE=1 /bin/bash -c \"$(curl -fsSL https://raw.githubusercontent.com/Homebrew/install/HEAD/install.sh)\"".to_string(),
            },
        )
        .remediation("Install Homebrew from https://brew.sh and re-run kitup"),
        Capability::new(
            "shell-env",
            Detect::Profile {
                lines: exports.clone(),
            },
            Action::Profile { lines: exports },
        )
        .requires(["brew"]),
        Capability::new(
            "git",
            Detect::Command {
                name: "git".to_string(),
                version: None,
            },
            Action::Package {
                name: "git".to_string(),
                version: None,
                cask: false,
                link: false,
            },
        )
        .requires(["brew"]),
        Capability::new(
            "python311",
            Detect::Command {
                name: "python3.11".to_string(),
                version: Some("3.11".to_string()),
            },
            Action::Package {
                name: "python".to_string(),
                version: Some("3.11".to_string()),
                cask: false,
                link: true,
            },
        )
        .requires(["brew"])
        .remediation("Run `brew install python@3.11 && brew link --overwrite python@3.11`"),
        Capability::new(
            "node",
            Detect::Command {
                name: "node".to_string(),
                version: None,
            },
            Action::Package {
                name: "node".to_string(),
                version: None,
                cask: false,
                link: false,
            },
        )
        .requires(["brew"]),
        Capability::new(
            "uv",
            Detect::Command {
                name: "uv".to_string(),
                version: None,
            },
            Action::Shell {
                command: "curl -LsSf https://astral.sh/uv/install.sh | sh".to_string(),
            },
        )
        .requires(["python311"])
        .retry(RetryPolicy::new(3, 2)),
        Capability::new(
            "docker",
            Detect::Command {
                name: "docker".to_string(),
                version: None,
            },
            Action::Package {
                name: "docker".to_string(),
                version: None,
                cask: true,
                link: false,
            },
        )
        .requires(["brew"])
        .remediation("Install Docker Desktop from https://www.docker.com/products/docker-desktop"),
        Capability::new(
            "docker-daemon",
            Detect::Service {
                check: "docker info".to_string(),
            },
            Action::Service {
                start: docker_start.to_string(),
                check: "docker info".to_string(),
                wait: RetryPolicy::service_wait(),
            },
        )
        .requires(["docker"])
        .remediation("Start Docker Desktop manually, wait for it to report running, then re-run kitup"),
        Capability::new(
            "supabase",
            Detect::Command {
                name: "supabase".to_string(),
                version: None,
            },
            Action::Package {
                name: "supabase/tap/supabase".to_string(),
                version: None,
                cask: false,
                link: false,
            },
        )
        .requires(["brew"]),
    ]
}
