//! Immutable policy snapshot handed to the context.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use crate::observability::metrics::{MetricPublisher, MetricsSink};
use crate::observability::tracing::{ConsumerTracing, ProducerTracing};
use crate::policy::callbacks::{ErrorCallback, HungMessageCallback, SuccessCallback};
use crate::policy::executor::ExecutionResource;
use crate::properties::ClientProperties;

/// Experimental feature flags.
pub type Tunables = BTreeSet<String>;

/// Context-level policy, read once by the context at construction.
///
/// Obtained from [`ContextPolicyBuilder::build`](crate::policy::ContextPolicyBuilder::build).
/// The `'r` lifetime is that of a borrowed execution resource; a policy
/// using the default pool is `ContextPolicy<'static>`.
#[derive(Clone)]
pub struct ContextPolicy<'r> {
    pub(crate) execution_resource: ExecutionResource<'r>,
    pub(crate) metrics_sink: MetricsSink,
    pub(crate) error_callback: ErrorCallback,
    pub(crate) success_callback: SuccessCallback,
    pub(crate) hung_message_callback: HungMessageCallback,
    pub(crate) client_properties: ClientProperties,
    pub(crate) message_processing_timeout: Duration,
    pub(crate) connection_error_threshold: Option<Duration>,
    pub(crate) tunables: Tunables,
    pub(crate) consumer_tracing: Option<Arc<dyn ConsumerTracing>>,
    pub(crate) producer_tracing: Option<Arc<dyn ProducerTracing>>,
    pub(crate) shuffle_connection_endpoints: Option<bool>,
}

impl<'r> ContextPolicy<'r> {
    pub const DEFAULT_MESSAGE_PROCESSING_TIMEOUT: Duration = Duration::from_secs(60);

    pub(crate) fn with_properties(client_properties: ClientProperties) -> Self {
        Self {
            execution_resource: ExecutionResource::default(),
            metrics_sink: MetricsSink::Disabled,
            error_callback: ErrorCallback::Disabled,
            success_callback: SuccessCallback::Disabled,
            hung_message_callback: HungMessageCallback::Disabled,
            client_properties,
            message_processing_timeout: Self::DEFAULT_MESSAGE_PROCESSING_TIMEOUT,
            connection_error_threshold: None,
            tunables: Tunables::new(),
            consumer_tracing: None,
            producer_tracing: None,
            shuffle_connection_endpoints: None,
        }
    }

    pub fn execution_resource(&self) -> &ExecutionResource<'r> {
        &self.execution_resource
    }

    pub fn metrics_sink(&self) -> &MetricsSink {
        &self.metrics_sink
    }

    /// Shortcut for `metrics_sink().publisher()`.
    pub fn metric_publisher(&self) -> Option<&Arc<dyn MetricPublisher>> {
        self.metrics_sink.publisher()
    }

    pub fn error_callback(&self) -> &ErrorCallback {
        &self.error_callback
    }

    pub fn success_callback(&self) -> &SuccessCallback {
        &self.success_callback
    }

    pub fn hung_message_callback(&self) -> &HungMessageCallback {
        &self.hung_message_callback
    }

    pub fn client_properties(&self) -> &ClientProperties {
        &self.client_properties
    }

    /// Time a consumer has to process a message before it is reported hung.
    pub fn message_processing_timeout(&self) -> Duration {
        self.message_processing_timeout
    }

    /// Time without a successful connection after which the error callback
    /// fires. `None`: retry indefinitely without time-based escalation.
    pub fn connection_error_threshold(&self) -> Option<Duration> {
        self.connection_error_threshold
    }

    pub fn tunables(&self) -> &Tunables {
        &self.tunables
    }

    pub fn is_tunable_set(&self, name: &str) -> bool {
        self.tunables.contains(name)
    }

    pub fn consumer_tracing(&self) -> Option<&Arc<dyn ConsumerTracing>> {
        self.consumer_tracing.as_ref()
    }

    pub fn producer_tracing(&self) -> Option<&Arc<dyn ProducerTracing>> {
        self.producer_tracing.as_ref()
    }

    /// `None` leaves endpoint ordering to the resolver.
    pub fn shuffle_connection_endpoints(&self) -> Option<bool> {
        self.shuffle_connection_endpoints
    }

    /// Whether a message outstanding for `elapsed` counts as hung.
    ///
    /// With a zero timeout every outstanding message is hung.
    pub fn is_message_hung(&self, elapsed: Duration) -> bool {
        elapsed >= self.message_processing_timeout
    }

    /// Whether `since_last_success` without a connection warrants calling
    /// the error callback. Always false while the threshold is unset.
    pub fn should_escalate_connection_error(&self, since_last_success: Duration) -> bool {
        self.connection_error_threshold
            .is_some_and(|threshold| since_last_success >= threshold)
    }

    /// Serializable view of the policy for diagnostics.
    pub fn summary(&self) -> PolicySummary {
        PolicySummary {
            execution_resource: match self.execution_resource {
                ExecutionResource::Default(settings) => format!(
                    "default pool (min {}, max {}, idle {}ms)",
                    settings.min_threads,
                    settings.max_threads,
                    settings.max_idle.as_millis()
                ),
                ExecutionResource::Borrowed(_) => "caller-supplied executor".to_string(),
            },
            metrics_enabled: self.metrics_sink.is_enabled(),
            error_callback: self.error_callback.is_enabled(),
            success_callback: self.success_callback.is_enabled(),
            hung_message_callback: self.hung_message_callback.is_enabled(),
            client_properties: self.client_properties.clone(),
            message_processing_timeout_ms: duration_ms(self.message_processing_timeout),
            connection_error_threshold_ms: self.connection_error_threshold.map(duration_ms),
            tunables: self.tunables.iter().cloned().collect(),
            consumer_tracing: self.consumer_tracing.is_some(),
            producer_tracing: self.producer_tracing.is_some(),
            shuffle_connection_endpoints: self.shuffle_connection_endpoints,
        }
    }
}

/// Whole milliseconds in `d`, saturating at `u64::MAX`.
pub fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

impl fmt::Debug for ContextPolicy<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextPolicy")
            .field("execution_resource", &self.execution_resource)
            .field("metrics_sink", &self.metrics_sink)
            .field("error_callback", &self.error_callback)
            .field("success_callback", &self.success_callback)
            .field("hung_message_callback", &self.hung_message_callback)
            .field("client_properties", &self.client_properties)
            .field("message_processing_timeout", &self.message_processing_timeout)
            .field("connection_error_threshold", &self.connection_error_threshold)
            .field("tunables", &self.tunables)
            .field("consumer_tracing", &self.consumer_tracing.is_some())
            .field("producer_tracing", &self.producer_tracing.is_some())
            .field("shuffle_connection_endpoints", &self.shuffle_connection_endpoints)
            .finish()
    }
}

impl Default for ContextPolicy<'_> {
    fn default() -> Self {
        Self::with_properties(ClientProperties::default())
    }
}

/// Diagnostic rendering of a [`ContextPolicy`].
#[derive(Debug, Clone, Serialize)]
pub struct PolicySummary {
    pub execution_resource: String,
    pub metrics_enabled: bool,
    pub error_callback: bool,
    pub success_callback: bool,
    pub hung_message_callback: bool,
    pub client_properties: ClientProperties,
    pub message_processing_timeout_ms: u64,
    pub connection_error_threshold_ms: Option<u64>,
    pub tunables: Vec<String>,
    pub consumer_tracing: bool,
    pub producer_tracing: bool,
    pub shuffle_connection_endpoints: Option<bool>,
}
