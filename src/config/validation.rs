//! Policy file validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Reject reserved or malformed client property names
//! - Reject tunables when the `experimental` feature is off
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Pure function: &PolicyFile → Result<(), Vec<ValidationError>>
//! - Property names are checked by the same routine the builder uses

use thiserror::Error;

use crate::config::schema::PolicyFile;
use crate::error::PolicyError;
use crate::properties::validate_property_name;

/// A single semantic problem in a policy file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("client_properties: {0}")]
    ClientProperty(PolicyError),

    #[error("tunable `{0}` requires the `experimental` feature")]
    TunablesDisabled(String),

    #[error("tunable names must not be empty")]
    EmptyTunable,

    #[error("unknown log level `{0}`")]
    LogLevel(String),

    #[error("{field} = {secs} is too large; at most {} seconds", MAX_DURATION_SECS)]
    DurationOutOfRange { field: &'static str, secs: u64 },
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Durations are reported in milliseconds as `u64`.
pub const MAX_DURATION_SECS: u64 = u64::MAX / 1000;

/// Check a parsed policy file, collecting every problem found.
pub fn validate_policy_file(file: &PolicyFile) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let durations = [
        ("message_processing_timeout_secs", file.message_processing_timeout_secs),
        ("connection_error_threshold_secs", file.connection_error_threshold_secs),
    ];
    for (field, secs) in durations {
        if let Some(secs) = secs.filter(|s| *s > MAX_DURATION_SECS) {
            errors.push(ValidationError::DurationOutOfRange { field, secs });
        }
    }

    for name in file.client_properties.keys() {
        if let Err(e) = validate_property_name(name) {
            errors.push(ValidationError::ClientProperty(e));
        }
    }

    for tunable in &file.tunables {
        if tunable.is_empty() {
            errors.push(ValidationError::EmptyTunable);
        } else if !cfg!(feature = "experimental") {
            errors.push(ValidationError::TunablesDisabled(tunable.clone()));
        }
    }

    let level = file.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::LogLevel(file.observability.log_level.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
