//! Builder behaviour as seen by a context initializer.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use amqp_context_policy::observability::metrics::{MetricPublisher, MetricsSink};
use amqp_context_policy::observability::tracing::{ConsumerTracing, ProducerTracing, SpanTracing};
use amqp_context_policy::policy::{
    ErrorCallback, Executor, HungMessage, HungMessageCallback, SuccessCallback,
};
use amqp_context_policy::properties::{
    HostIdentity, DEFAULT_CLIENT_PROPERTIES, RESERVED_CLIENT_PROPERTIES,
};
use amqp_context_policy::{ContextPolicyBuilder, FieldValue, PolicyError};

mod common;

use common::{InlineExecutor, RecordingPublisher};

#[test]
fn test_default_snapshot() {
    let policy = ContextPolicyBuilder::new().build().unwrap();

    assert_eq!(policy.message_processing_timeout(), Duration::from_secs(60));
    assert_eq!(policy.connection_error_threshold(), None);
    assert_eq!(policy.shuffle_connection_endpoints(), None);
    assert!(!policy.error_callback().is_enabled());
    assert!(!policy.success_callback().is_enabled());
    assert!(!policy.hung_message_callback().is_enabled());

    let props = policy.client_properties();
    assert_eq!(props.len(), DEFAULT_CLIENT_PROPERTIES.len());
    for key in DEFAULT_CLIENT_PROPERTIES {
        assert!(props.contains_key(key), "missing default key {}", key);
    }
    for key in RESERVED_CLIENT_PROPERTIES {
        assert!(!props.contains_key(key), "reserved key {} present", key);
    }
    assert_eq!(
        props.get("pid").and_then(FieldValue::as_int),
        Some(i64::from(std::process::id()))
    );
}

#[test]
fn test_reserved_property_rejected_without_change() {
    let mut builder = ContextPolicyBuilder::new();
    let before = builder.client_properties().clone();

    for _ in 0..2 {
        let err = builder
            .set_client_property("platform", "rust".into())
            .unwrap_err();
        assert_eq!(
            err,
            PolicyError::ReservedClientProperty {
                name: "platform".into()
            }
        );
        assert_eq!(builder.client_properties(), &before);
    }
}

#[test]
fn test_default_property_override() {
    let mut builder = ContextPolicyBuilder::new();
    let before = builder.client_properties().clone();

    builder.set_client_property("task", "X".into()).unwrap();

    let props = builder.client_properties();
    assert_eq!(props.get("task"), Some(&FieldValue::from("X")));
    for key in DEFAULT_CLIENT_PROPERTIES.iter().filter(|k| **k != "task") {
        assert_eq!(props.get(key), before.get(key));
    }
    assert_eq!(props.len(), before.len());
}

#[test]
fn test_with_host_seeds_properties() {
    let host = HostIdentity {
        task: "replayer".into(),
        pid: 4242,
        os: "Linux".into(),
        os_version: "6.8.0".into(),
        os_patch: "#1 SMP PREEMPT_DYNAMIC".into(),
    };
    let builder = ContextPolicyBuilder::with_host(&host);
    assert_eq!(
        builder.client_properties().get("task"),
        Some(&FieldValue::from("replayer"))
    );
    assert_eq!(builder.client_properties().get("pid"), Some(&FieldValue::Int(4242)));
}

#[test]
fn test_connection_error_threshold_unset_restores() {
    let mut builder = ContextPolicyBuilder::new();
    builder.set_connection_error_threshold(Some(Duration::from_secs(90)));
    assert_eq!(builder.connection_error_threshold(), Some(Duration::from_secs(90)));

    builder.set_connection_error_threshold(None);
    assert_eq!(builder.connection_error_threshold(), None);
    assert!(!builder
        .build()
        .unwrap()
        .should_escalate_connection_error(Duration::from_secs(3600)));
}

#[test]
fn test_shut_down_executor_rejected() {
    let executor = InlineExecutor::new();
    executor.shut_down();

    let mut builder = ContextPolicyBuilder::new();
    builder.set_execution_resource(&executor);

    assert_eq!(builder.build().unwrap_err(), PolicyError::ExecutionResourceUnavailable);
    assert_eq!(executor.executed.load(Ordering::SeqCst), 0);
}

#[test]
fn test_borrowed_executor_runs_callbacks() {
    let executor = InlineExecutor::new();
    let mut builder = ContextPolicyBuilder::new();
    builder.set_execution_resource(&executor);

    let policy = builder.build().unwrap();
    let resource = policy.execution_resource().executor().unwrap();
    resource.execute(Box::new(|| {})).unwrap();

    assert_eq!(executor.executed.load(Ordering::SeqCst), 1);
}

#[test]
fn test_metric_sink_replaced_not_aggregated() {
    let a = Arc::new(RecordingPublisher::default());
    let b = Arc::new(RecordingPublisher::default());

    let mut builder = ContextPolicyBuilder::new();
    builder.set_metric_publisher(a.clone());
    builder.set_metric_publisher(b.clone());

    let policy = builder.build().unwrap();
    drop(builder);

    let b_dyn: Arc<dyn MetricPublisher> = b.clone();
    assert!(Arc::ptr_eq(policy.metric_publisher().unwrap(), &b_dyn));
    assert_eq!(Arc::strong_count(&a), 1, "first publisher must not be retained");

    policy.metrics_sink().publish_counter("published_messages", 2.0, &[]);
    assert!(a.published.lock().unwrap().is_empty());
    assert_eq!(
        *b.published.lock().unwrap(),
        vec![("published_messages".to_string(), 2.0)]
    );
}

#[test]
fn test_metric_sink_can_be_disabled_again() {
    let mut builder = ContextPolicyBuilder::new();
    builder
        .set_metric_publisher(Arc::new(RecordingPublisher::default()))
        .set_metrics_sink(MetricsSink::Disabled);
    assert!(builder.metric_publisher().is_none());
}

#[test]
fn test_snapshot_isolated_from_later_mutation() {
    let mut builder = ContextPolicyBuilder::new();
    builder.set_message_processing_timeout(Duration::from_secs(10));
    let policy = builder.build().unwrap();

    builder
        .set_message_processing_timeout(Duration::from_secs(99))
        .set_shuffle_connection_endpoints(true)
        .set_client_property("team", "ops".into())
        .unwrap();

    assert_eq!(policy.message_processing_timeout(), Duration::from_secs(10));
    assert_eq!(policy.shuffle_connection_endpoints(), None);
    assert!(!policy.client_properties().contains_key("team"));
}

#[test]
fn test_callbacks_reach_the_snapshot() {
    let errors = Arc::new(Mutex::new(Vec::new()));
    let successes = Arc::new(AtomicUsize::new(0));
    let hung = Arc::new(AtomicUsize::new(0));

    let mut builder = ContextPolicyBuilder::new();
    {
        let errors = errors.clone();
        let successes = successes.clone();
        let hung = hung.clone();
        builder
            .set_error_callback(ErrorCallback::new(move |text, code| {
                errors.lock().unwrap().push((text.to_string(), code));
            }))
            .set_success_callback(SuccessCallback::new(move || {
                successes.fetch_add(1, Ordering::SeqCst);
            }))
            .set_hung_message_callback(HungMessageCallback::new(move |messages| {
                hung.fetch_add(messages.len(), Ordering::SeqCst);
            }));
    }

    let policy = builder.build().unwrap();
    policy.error_callback().notify("CONNECTION_FORCED", 320);
    policy.success_callback().notify();
    policy.hung_message_callback().notify(&[HungMessage {
        connection_name: "orders-consumer".into(),
        queue: "orders".into(),
        consumer_tag: "ctag-1".into(),
        delivery_tag: 17,
        outstanding_for: Duration::from_secs(75),
    }]);

    assert_eq!(
        *errors.lock().unwrap(),
        vec![("CONNECTION_FORCED".to_string(), 320)]
    );
    assert_eq!(successes.load(Ordering::SeqCst), 1);
    assert_eq!(hung.load(Ordering::SeqCst), 1);
}

#[test]
fn test_callback_disabled_explicitly() {
    let mut builder = ContextPolicyBuilder::new();
    builder
        .set_error_callback(ErrorCallback::new(|_, _| {}))
        .set_error_callback(ErrorCallback::Disabled);
    assert!(!builder.error_callback().is_enabled());
}

#[test]
fn test_tracing_capabilities_round_trip() {
    let consumer: Arc<dyn ConsumerTracing> = Arc::new(SpanTracing);
    let producer: Arc<dyn ProducerTracing> = Arc::new(SpanTracing);

    let mut builder = ContextPolicyBuilder::new();
    builder
        .set_consumer_tracing(consumer.clone())
        .set_producer_tracing(producer.clone());

    let policy = builder.build().unwrap();
    assert!(Arc::ptr_eq(policy.consumer_tracing().unwrap(), &consumer));
    assert!(Arc::ptr_eq(policy.producer_tracing().unwrap(), &producer));
    assert!(policy.summary().consumer_tracing);
}

#[test]
#[allow(deprecated)]
fn test_deprecated_encoding_switch_is_inert() {
    let mut builder = ContextPolicyBuilder::new();
    let before = format!("{:?}", builder.snapshot());
    builder
        .use_rabbitmq_field_value_encoding(false)
        .use_rabbitmq_field_value_encoding(true);
    assert_eq!(format!("{:?}", builder.snapshot()), before);
}

#[test]
fn test_policy_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<amqp_context_policy::ContextPolicy<'static>>();

    let policy = ContextPolicyBuilder::new().build().unwrap();
    let handle = std::thread::spawn(move || policy.message_processing_timeout());
    assert_eq!(handle.join().unwrap(), Duration::from_secs(60));
}
