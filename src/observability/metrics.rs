//! Metric publishing capability.
//!
//! # Responsibilities
//! - Define the sink interface the connection layer publishes through
//! - Provide a disabled sink and a sink backed by the `metrics` facade
//!
//! # Metrics
//! Names are chosen by the connection layer, e.g. `published_messages`
//! (counter), `unconfirmed_messages` (gauge) or `confirm_latency`
//! (distribution). Tags carry `vhost`, `queue`, `exchange`.
//!
//! # Design Decisions
//! - A disabled sink is an explicit variant, not a silent stub
//! - Sinks are shared (`Arc`) and replaced wholesale, never aggregated

use std::fmt;
use std::sync::Arc;

use metrics::Label;

/// Tags attached to a published metric.
pub type MetricTags = [(String, String)];

/// Receives metrics generated by the messaging client.
///
/// Called from the client's own threads; implementations must not block.
pub trait MetricPublisher: Send + Sync {
    fn publish_gauge(&self, name: &str, value: f64, tags: &MetricTags);

    fn publish_counter(&self, name: &str, value: f64, tags: &MetricTags);

    fn publish_summary(&self, name: &str, value: f64, tags: &MetricTags);

    fn publish_distribution(&self, name: &str, value: f64, tags: &MetricTags);
}

/// Forwards to whatever recorder is installed for the `metrics` crate.
///
/// Summaries and distributions both become histograms.
#[derive(Debug, Clone)]
pub struct MetricsFacadePublisher {
    prefix: String,
}

impl MetricsFacadePublisher {
    pub const DEFAULT_PREFIX: &'static str = "rmq";

    pub fn new() -> Self {
        Self::with_prefix(Self::DEFAULT_PREFIX)
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    fn key(&self, name: &str) -> String {
        if self.prefix.is_empty() {
            name.to_string()
        } else {
            format!("{}_{}", self.prefix, name)
        }
    }

    fn labels(tags: &MetricTags) -> Vec<Label> {
        tags.iter()
            .map(|(k, v)| Label::new(k.clone(), v.clone()))
            .collect()
    }
}

impl Default for MetricsFacadePublisher {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricPublisher for MetricsFacadePublisher {
    fn publish_gauge(&self, name: &str, value: f64, tags: &MetricTags) {
        metrics::gauge!(self.key(name), Self::labels(tags)).set(value);
    }

    fn publish_counter(&self, name: &str, value: f64, tags: &MetricTags) {
        // Counters are monotonic integers in the facade.
        metrics::counter!(self.key(name), Self::labels(tags)).increment(value.max(0.0) as u64);
    }

    fn publish_summary(&self, name: &str, value: f64, tags: &MetricTags) {
        metrics::histogram!(self.key(name), Self::labels(tags)).record(value);
    }

    fn publish_distribution(&self, name: &str, value: f64, tags: &MetricTags) {
        metrics::histogram!(self.key(name), Self::labels(tags)).record(value);
    }
}

/// The metrics sink held by a policy.
#[derive(Clone, Default)]
pub enum MetricsSink {
    /// No metrics are published.
    #[default]
    Disabled,
    Publisher(Arc<dyn MetricPublisher>),
}

impl MetricsSink {
    pub fn is_enabled(&self) -> bool {
        matches!(self, MetricsSink::Publisher(_))
    }

    /// The configured publisher, if any.
    pub fn publisher(&self) -> Option<&Arc<dyn MetricPublisher>> {
        match self {
            MetricsSink::Disabled => None,
            MetricsSink::Publisher(p) => Some(p),
        }
    }

    pub fn publish_gauge(&self, name: &str, value: f64, tags: &MetricTags) {
        if let MetricsSink::Publisher(p) = self {
            p.publish_gauge(name, value, tags);
        }
    }

    pub fn publish_counter(&self, name: &str, value: f64, tags: &MetricTags) {
        if let MetricsSink::Publisher(p) = self {
            p.publish_counter(name, value, tags);
        }
    }

    pub fn publish_summary(&self, name: &str, value: f64, tags: &MetricTags) {
        if let MetricsSink::Publisher(p) = self {
            p.publish_summary(name, value, tags);
        }
    }

    pub fn publish_distribution(&self, name: &str, value: f64, tags: &MetricTags) {
        if let MetricsSink::Publisher(p) = self {
            p.publish_distribution(name, value, tags);
        }
    }
}

impl From<Arc<dyn MetricPublisher>> for MetricsSink {
    fn from(publisher: Arc<dyn MetricPublisher>) -> Self {
        MetricsSink::Publisher(publisher)
    }
}

impl fmt::Debug for MetricsSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricsSink::Disabled => f.write_str("Disabled"),
            MetricsSink::Publisher(_) => f.write_str("Publisher(..)"),
        }
    }
}
