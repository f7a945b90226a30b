//! Error definitions for policy construction.

use thiserror::Error;

/// Configuration-time rejections raised by the policy builder.
///
/// Every variant is an invalid-configuration condition. They are returned
/// synchronously from the setter (or from `build()`) that detected them and
/// never deferred to connection time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    /// Attempt to set one of the broker-identification properties.
    #[error("client property `{name}` is reserved and cannot be overridden")]
    ReservedClientProperty { name: String },

    /// Property name cannot be encoded as an AMQP field-table key.
    #[error("invalid client property name `{name}`: {reason}")]
    InvalidClientPropertyName { name: String, reason: &'static str },

    /// The borrowed execution resource refused work at handoff.
    #[error("execution resource is not accepting work")]
    ExecutionResourceUnavailable,
}

/// Result type for policy operations.
pub type PolicyResult<T> = Result<T, PolicyError>;

/// Failures surfaced by an execution resource at runtime.
///
/// These belong to the external context; the policy layer only defines the
/// shape so executors can report them.
#[derive(Debug, Error)]
pub enum ExecutorError {
    /// The executor refused the job (shut down, saturated, ...).
    #[error("job rejected by executor: {0}")]
    Rejected(String),
}
