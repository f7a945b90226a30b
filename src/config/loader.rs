//! Policy loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::PolicyFile;
use crate::config::validation::ValidationError;
use crate::error::PolicyError;
use crate::policy::ContextPolicyBuilder;

/// Error type for policy file handling.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),

    #[error("Policy rejected: {0}")]
    Policy(#[from] PolicyError),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate a policy file.
pub fn load_policy_file(path: &Path) -> Result<PolicyFile, ConfigError> {
    let content = fs::read_to_string(path)?;
    let file = PolicyFile::from_toml_str(&content)?;
    tracing::debug!(path = %path.display(), "Policy file loaded");
    Ok(file)
}

/// Builder with defaults, overlaid with the policy file at `path`.
pub fn builder_from_file(path: &Path) -> Result<ContextPolicyBuilder<'static>, ConfigError> {
    let file = load_policy_file(path)?;
    let mut builder = ContextPolicyBuilder::new();
    file.apply(&mut builder)?;
    Ok(builder)
}
