//! Observability capabilities referenced by the policy.
//!
//! # Data Flow
//! ```text
//! Caller supplies (via the policy builder):
//!     → metrics.rs (MetricPublisher / MetricsSink)
//!     → tracing.rs (ConsumerTracing, ProducerTracing)
//!
//! Connection layer (external) calls them:
//!     → per published/consumed message
//!     → per periodic metric sample
//!
//! logging.rs initialises the subscriber for the CLI.
//! ```
//!
//! # Design Decisions
//! - Capabilities are trait objects behind `Arc`, shared with client threads
//! - Every capability has a usable built-in implementation

pub mod logging;
pub mod metrics;
pub mod tracing;

pub use self::metrics::{MetricPublisher, MetricsFacadePublisher, MetricsSink};
pub use self::tracing::{
    ConfirmResponse, ConsumerTracing, DeliveryInfo, ProducerTracing, ProducerTracingContext,
    PublishInfo, SpanTracing, TracingContext,
};
