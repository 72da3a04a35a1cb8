//! Provisioning run orchestration.

pub mod cancel;
pub mod engine;
pub mod preflight;
pub mod verifier;

pub use cancel::CancelFlag;
pub use engine::{ProvisionEvent, ProvisioningEngine};
pub use preflight::{Finding, FindingLevel};
pub use verifier::Verifier;
