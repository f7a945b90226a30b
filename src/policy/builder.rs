//! Fluent builder for [`ContextPolicy`].

use std::ops::Deref;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{PolicyError, PolicyResult};
use crate::observability::metrics::{MetricPublisher, MetricsSink};
use crate::observability::tracing::{ConsumerTracing, ProducerTracing};
use crate::policy::callbacks::{ErrorCallback, HungMessageCallback, SuccessCallback};
use crate::policy::executor::{ExecutionResource, Executor};
use crate::policy::snapshot::{duration_ms, ContextPolicy};
use crate::properties::{ClientProperties, FieldValue, HostIdentity, PropertyKeyClass};

/// Accumulates context policy before any connection is attempted.
///
/// Setters return `&mut Self` so calls chain. Reads go through `Deref` to
/// the policy being built, so every accessor of [`ContextPolicy`] is
/// available here and reflects the latest setter call.
///
/// ```
/// use std::time::Duration;
/// use amqp_context_policy::ContextPolicyBuilder;
///
/// let mut builder = ContextPolicyBuilder::new();
/// builder
///     .set_message_processing_timeout(Duration::from_secs(30))
///     .set_connection_error_threshold(Some(Duration::from_secs(120)))
///     .set_client_property("task", "billing".into())?
///     .set_shuffle_connection_endpoints(true);
///
/// let policy = builder.build()?;
/// assert_eq!(policy.message_processing_timeout(), Duration::from_secs(30));
/// # Ok::<(), amqp_context_policy::PolicyError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ContextPolicyBuilder<'r> {
    policy: ContextPolicy<'r>,
}

impl<'r> ContextPolicyBuilder<'r> {
    /// Builder with every field at its default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder whose defaulted client properties come from `host`.
    pub fn with_host(host: &HostIdentity) -> Self {
        Self {
            policy: ContextPolicy::with_properties(ClientProperties::from_host(host)),
        }
    }

    /// Run callbacks on `executor` instead of a context-owned pool.
    ///
    /// The executor is borrowed; it must stay alive as long as any policy
    /// built from this builder, and that is enforced by `'r`. Whether it
    /// still accepts work is checked in [`build`](Self::build).
    pub fn set_execution_resource(&mut self, executor: &'r dyn Executor) -> &mut Self {
        self.policy.execution_resource = ExecutionResource::Borrowed(executor);
        self
    }

    /// Replace the metrics sink. The previous publisher handle is dropped.
    pub fn set_metric_publisher(&mut self, publisher: Arc<dyn MetricPublisher>) -> &mut Self {
        self.set_metrics_sink(MetricsSink::Publisher(publisher))
    }

    /// Replace the metrics sink, `MetricsSink::Disabled` included.
    pub fn set_metrics_sink(&mut self, sink: MetricsSink) -> &mut Self {
        self.policy.metrics_sink = sink;
        self
    }

    pub fn set_error_callback(&mut self, callback: ErrorCallback) -> &mut Self {
        self.policy.error_callback = callback;
        self
    }

    pub fn set_success_callback(&mut self, callback: SuccessCallback) -> &mut Self {
        self.policy.success_callback = callback;
        self
    }

    pub fn set_hung_message_callback(&mut self, callback: HungMessageCallback) -> &mut Self {
        self.policy.hung_message_callback = callback;
        self
    }

    /// Insert or overwrite a client property.
    ///
    /// `task`, `pid`, `os`, `os_version` and `os_patch` are pre-populated and
    /// may be overwritten. `capabilities`, `platform`, `product`, `version`
    /// and `connection_name` are reserved: setting one fails with
    /// [`PolicyError::ReservedClientProperty`] and leaves the properties
    /// unchanged.
    pub fn set_client_property(&mut self, name: &str, value: FieldValue) -> PolicyResult<&mut Self> {
        match self.policy.client_properties.set(name, value) {
            Ok(PropertyKeyClass::Defaulted) => {
                tracing::debug!(property = name, "Overriding default client property");
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(property = name, error = %e, "Client property rejected");
                return Err(e);
            }
        }
        Ok(self)
    }

    /// Time consumers have to process a message before warnings are logged
    /// and the hung-message callback fires.
    ///
    /// Detection is periodic, so reports lag the timeout. A zero timeout is
    /// accepted; every outstanding message is then reported on the first
    /// monitor cycle.
    pub fn set_message_processing_timeout(&mut self, timeout: Duration) -> &mut Self {
        self.policy.message_processing_timeout = timeout;
        self
    }

    /// Time without a successful connection after which the error callback
    /// is called. `None` restores the default: retry indefinitely with no
    /// time-based escalation.
    pub fn set_connection_error_threshold(&mut self, threshold: Option<Duration>) -> &mut Self {
        self.policy.connection_error_threshold = threshold;
        self
    }

    /// Open a tracing context per delivered message, lasting until the
    /// consumer's processing function returns.
    pub fn set_consumer_tracing(&mut self, tracing: Arc<dyn ConsumerTracing>) -> &mut Self {
        self.policy.consumer_tracing = Some(tracing);
        self
    }

    /// Open a tracing context per published message, lasting until its
    /// confirm arrives.
    pub fn set_producer_tracing(&mut self, tracing: Arc<dyn ProducerTracing>) -> &mut Self {
        self.policy.producer_tracing = Some(tracing);
        self
    }

    /// Ask the resolver to shuffle endpoints instead of preferring the
    /// longest matching subnet prefix, which skews connections towards
    /// particular nodes.
    pub fn set_shuffle_connection_endpoints(&mut self, shuffle: bool) -> &mut Self {
        self.policy.shuffle_connection_endpoints = Some(shuffle);
        self
    }

    /// Add an experimental tunable. Names are not checked here.
    #[cfg(feature = "experimental")]
    pub fn set_tunable(&mut self, tunable: impl Into<String>) -> &mut Self {
        self.policy.tunables.insert(tunable.into());
        self
    }

    /// RabbitMQ field-value encoding is always used; this has no effect.
    #[deprecated(note = "RabbitMQ field value encoding is always used")]
    pub fn use_rabbitmq_field_value_encoding(&mut self, _rabbit_encoding: bool) -> &mut Self {
        self
    }

    /// Copy of the current state without handoff checks.
    pub fn snapshot(&self) -> ContextPolicy<'r> {
        self.policy.clone()
    }

    /// Validate and hand off an owned snapshot.
    ///
    /// Fails with [`PolicyError::ExecutionResourceUnavailable`] when a
    /// borrowed executor no longer accepts work. Later changes to this
    /// builder do not affect the returned policy.
    pub fn build(&self) -> PolicyResult<ContextPolicy<'r>> {
        if let Some(executor) = self.policy.execution_resource.executor() {
            if !executor.is_accepting() {
                tracing::warn!("Borrowed execution resource is not accepting work");
                return Err(PolicyError::ExecutionResourceUnavailable);
            }
        }

        if self.policy.message_processing_timeout.is_zero() {
            tracing::warn!(
                "Message processing timeout is zero; every outstanding message will be reported as hung"
            );
        }

        tracing::debug!(
            borrowed_executor = self.policy.execution_resource.is_borrowed(),
            metrics = self.policy.metrics_sink.is_enabled(),
            message_processing_timeout_ms = duration_ms(self.policy.message_processing_timeout),
            connection_error_threshold = ?self.policy.connection_error_threshold,
            client_properties = self.policy.client_properties.len(),
            "Context policy built"
        );

        Ok(self.snapshot())
    }
}

impl<'r> Deref for ContextPolicyBuilder<'r> {
    type Target = ContextPolicy<'r>;

    fn deref(&self) -> &Self::Target {
        &self.policy
    }
}
