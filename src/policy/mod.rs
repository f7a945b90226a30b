//! Context policy: construction and snapshot.
//!
//! # Data Flow
//! ```text
//! ContextPolicyBuilder::new()  (defaults + host client properties)
//!     → setters (fluent, fail fast on invalid input)
//!     → build() (handoff checks)
//!     → ContextPolicy (owned snapshot)
//!     → read once by the context initializer
//! ```
//!
//! # Design Decisions
//! - Snapshot is a clone; the builder can be reused or dropped freely
//! - Borrowed executor tracked by lifetime, not by raw pointer
//! - "Disabled" callbacks and sinks are explicit variants
//! - Tunables setter only exists with the `experimental` feature

pub mod builder;
pub mod callbacks;
pub mod executor;
pub mod snapshot;

pub use builder::ContextPolicyBuilder;
pub use callbacks::{Callback, ErrorCallback, HungMessage, HungMessageCallback, SuccessCallback};
pub use executor::{ExecutionResource, Executor, Job, ThreadPoolSettings};
pub use snapshot::{ContextPolicy, PolicySummary, Tunables};
