//! Context policy for an AMQP broker connection manager.
//!
//! Captures the decisions a messaging context runs under (callback
//! executor, failure notification, hung-message and connection-error
//! thresholds, client identification, tracing and metrics sinks) and hands
//! them to the context as an immutable snapshot.

pub mod config;
pub mod error;
pub mod observability;
pub mod policy;
pub mod properties;

pub use error::{ExecutorError, PolicyError, PolicyResult};
pub use policy::{ContextPolicy, ContextPolicyBuilder};
pub use properties::{FieldTable, FieldValue};
