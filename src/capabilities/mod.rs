//! Capabilities: what to provision, how to detect it, how to install it.

pub mod graph;
pub mod installer;
pub mod platform;
pub mod probe;
pub mod registry;
pub mod status;

pub use graph::{DependencyGraph, DependencyGraphBuilder};
pub use installer::{Installer, InstallerContext};
pub use platform::{Arch, OsFamily, Platform};
pub use probe::{Probe, SystemProbe};
pub use registry::{Action, Capability, CapabilityRegistry, Detect, RetryPolicy};
pub use status::ProbeStatus;
