//! Probe status types.
//!
//! Each probe produces a `ProbeStatus` describing whether and how a
//! capability is present on the host. Absence is an ordinary outcome,
//! never an error.

use serde::Serialize;
use std::fmt;

/// The result of probing a single capability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProbeStatus {
    /// Capability is present and meets its constraints.
    Satisfied,

    /// Capability is not present at all.
    Missing {
        /// Why the probe concluded it is absent.
        reason: String,
    },

    /// Executable exists but its version does not meet the constraint.
    /// Triggers a repair (install + relink) rather than a fresh install.
    WrongVersion {
        /// Version reported by the tool (or the raw output when unparseable).
        found: String,
        /// Required version prefix.
        required: String,
    },

    /// A background service is not running or not reachable.
    ServiceDown {
        /// Human-readable detail of the failed readiness check.
        reason: String,
    },
}

impl ProbeStatus {
    /// Shorthand for a `Missing` status.
    pub fn missing(reason: impl Into<String>) -> Self {
        Self::Missing {
            reason: reason.into(),
        }
    }

    /// Shorthand for a `ServiceDown` status.
    pub fn service_down(reason: impl Into<String>) -> Self {
        Self::ServiceDown {
            reason: reason.into(),
        }
    }

    /// Whether the capability is satisfied.
    pub fn is_satisfied(&self) -> bool {
        matches!(self, ProbeStatus::Satisfied)
    }
}

impl fmt::Display for ProbeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeStatus::Satisfied => write!(f, "satisfied"),
            ProbeStatus::Missing { reason } => write!(f, "missing ({})", reason),
            ProbeStatus::WrongVersion { found, required } => {
                write!(f, "found version {}, requires {}", found, required)
            }
            ProbeStatus::ServiceDown { reason } => write!(f, "not running ({})", reason),
        }
    }
}
