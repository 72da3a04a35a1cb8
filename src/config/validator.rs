//! Configuration validation rules.
//!
//! Structural checks on project capabilities that serde cannot express.
//! Prerequisite references and cycles are checked when the registry is
//! built, against the merged built-in and project set.

use std::collections::HashSet;

use crate::capabilities::{Action, Detect};
use crate::config::schema::KitupConfig;
use crate::error::{KitupError, Result};

/// Validation error with context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Rule identifier
    pub rule: String,
    /// Human-readable error message
    pub message: String,
    /// Capability name if error is capability-specific
    pub capability: Option<String>,
}

impl ValidationError {
    fn new(rule: &str, capability: Option<&str>, message: String) -> Self {
        Self {
            rule: rule.to_string(),
            message,
            capability: capability.map(str::to_string),
        }
    }
}

/// Validate a configuration and return all errors.
pub fn validate_config(config: &KitupConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if config.settings.retry.max_attempts == 0 {
        errors.push(ValidationError::new(
            "retry-attempts",
            None,
            "settings.retry.max_attempts must be at least 1".to_string(),
        ));
    }
    if config.settings.http_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "http-timeout",
            None,
            "settings.http_timeout_secs must be at least 1".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for cap in &config.capabilities {
        let name = cap.name.as_str();
        if name.trim().is_empty() {
            errors.push(ValidationError::new(
                "empty-name",
                None,
                "Capability names must not be empty".to_string(),
            ));
            continue;
        }
        if !seen.insert(name) {
            errors.push(ValidationError::new(
                "duplicate-capability",
                Some(name),
                format!("Capability '{}' is declared more than once", name),
            ));
        }
        if cap.prerequisites.iter().any(|p| p == name) {
            errors.push(ValidationError::new(
                "self-requirement",
                Some(name),
                format!("Capability '{}' requires itself", name),
            ));
        }
        if cap.retry.is_some_and(|r| r.max_attempts == 0) {
            errors.push(ValidationError::new(
                "retry-attempts",
                Some(name),
                format!("Capability '{}': retry.max_attempts must be at least 1", name),
            ));
        }

        match &cap.detect {
            Detect::Http { url } if !(url.starts_with("http://") || url.starts_with("https://")) => {
                errors.push(ValidationError::new(
                    "http-url",
                    Some(name),
                    format!("Capability '{}': '{}' is not an http(s) URL", name, url),
                ));
            }
            Detect::Profile { lines } if lines.is_empty() => {
                errors.push(ValidationError::new(
                    "empty-profile",
                    Some(name),
                    format!("Capability '{}': profile probe needs at least one line", name),
                ));
            }
            _ => {}
        }

        match &cap.install {
            Action::Shell { command } if command.trim().is_empty() => {
                errors.push(ValidationError::new(
                    "empty-command",
                    Some(name),
                    format!("Capability '{}': shell action has an empty command", name),
                ));
            }
            Action::Profile { lines } if lines.is_empty() => {
                errors.push(ValidationError::new(
                    "empty-profile",
                    Some(name),
                    format!("Capability '{}': profile action needs at least one line", name),
                ));
            }
            _ => {}
        }
    }

    errors
}

/// Validate and fail on the first batch of errors.
pub fn validate(config: &KitupConfig) -> Result<()> {
    let errors = validate_config(config);
    if errors.is_empty() {
        return Ok(());
    }
    Err(KitupError::ConfigValidationError {
        message: errors
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join("; "),
    })
}
