//! Policy file schema.
//!
//! Every field is optional so a minimal file only names what it changes.
//! Fields that carry code (callbacks, sinks, executors) cannot come from a
//! file and are set on the builder directly.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::validation::validate_policy_file;
use crate::config::ConfigError;
use crate::error::PolicyResult;
use crate::observability::logging::DEFAULT_LOG_LEVEL;
use crate::policy::ContextPolicyBuilder;
use crate::properties::FieldTable;

/// Root of a policy file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct PolicyFile {
    /// Message processing timeout in seconds.
    pub message_processing_timeout_secs: Option<u64>,

    /// Connection error threshold in seconds. Absent: never escalate on time.
    pub connection_error_threshold_secs: Option<u64>,

    /// Shuffle resolved broker endpoints.
    pub shuffle_connection_endpoints: Option<bool>,

    /// Experimental tunables; only accepted with the `experimental` feature.
    pub tunables: Vec<String>,

    /// Client properties to add or override.
    pub client_properties: FieldTable,

    pub observability: ObservabilityConfig,
}

/// Logging settings for the CLI.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl PolicyFile {
    /// Parse and validate a policy from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let file: PolicyFile = toml::from_str(content).map_err(ConfigError::Parse)?;
        validate_policy_file(&file).map_err(ConfigError::Validation)?;
        Ok(file)
    }

    /// Push every value present in the file through the builder setters.
    ///
    /// Values absent from the file leave the builder as it was.
    pub fn apply(&self, builder: &mut ContextPolicyBuilder<'_>) -> PolicyResult<()> {
        if let Some(secs) = self.message_processing_timeout_secs {
            builder.set_message_processing_timeout(Duration::from_secs(secs));
        }
        if let Some(secs) = self.connection_error_threshold_secs {
            builder.set_connection_error_threshold(Some(Duration::from_secs(secs)));
        }
        if let Some(shuffle) = self.shuffle_connection_endpoints {
            builder.set_shuffle_connection_endpoints(shuffle);
        }
        for (name, value) in &self.client_properties {
            builder.set_client_property(name, value.clone())?;
        }
        #[cfg(feature = "experimental")]
        for tunable in &self.tunables {
            builder.set_tunable(tunable.as_str());
        }
        Ok(())
    }
}
