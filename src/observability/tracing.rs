//! Message-flow tracing capabilities.
//!
//! # Responsibilities
//! - Define the hooks the connection layer calls to open a tracing context
//!   per consumed or published message
//! - Provide an implementation backed by `tracing` spans
//!
//! # Context Lifetimes
//! ```text
//! consumer: delivery received → create() → processing fn returns → drop
//! producer: send() → create() → broker confirm → response() → drop
//! ```
//!
//! # Design Decisions
//! - The context is an owned box; dropping it closes the span
//! - Producers may inject propagation headers into the outgoing table

use tracing::Span;

use crate::properties::FieldTable;

/// Metadata about a delivered message, borrowed for the `create` call.
#[derive(Debug, Clone, Copy)]
pub struct DeliveryInfo<'a> {
    pub queue: &'a str,
    pub exchange: &'a str,
    pub routing_key: &'a str,
    pub consumer_tag: &'a str,
    pub delivery_tag: u64,
    pub vhost: &'a str,
    pub headers: &'a FieldTable,
}

/// Metadata about a message about to be published.
#[derive(Debug, Clone, Copy)]
pub struct PublishInfo<'a> {
    pub exchange: &'a str,
    pub routing_key: &'a str,
    pub vhost: &'a str,
}

/// Broker outcome for a published message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmResponse {
    Ack,
    Reject,
    /// Returned as unroutable (`mandatory` publish).
    Return,
}

/// A live tracing context. Dropping it ends the traced interval.
pub trait TracingContext: Send {}

/// Producer-side context, told about the broker confirm before being dropped.
pub trait ProducerTracingContext: Send {
    fn response(&mut self, confirm: ConfirmResponse);
}

/// Opens a context around the hand-off of a delivered message to the
/// consumer's processing function.
pub trait ConsumerTracing: Send + Sync {
    fn create(&self, delivery: &DeliveryInfo<'_>) -> Box<dyn TracingContext>;
}

/// Opens a context spanning a publish until its confirm.
///
/// `headers` are the outgoing message headers and may be extended with
/// propagation fields.
pub trait ProducerTracing: Send + Sync {
    fn create(
        &self,
        publish: &PublishInfo<'_>,
        headers: &mut FieldTable,
    ) -> Box<dyn ProducerTracingContext>;
}

/// Tracing backed by `tracing` spans.
///
/// Consumer spans are named `amqp.consume`, producer spans `amqp.publish`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpanTracing;

struct SpanContext {
    _span: Span,
}

impl TracingContext for SpanContext {}

struct PublishSpanContext {
    span: Span,
}

impl ProducerTracingContext for PublishSpanContext {
    fn response(&mut self, confirm: ConfirmResponse) {
        self.span.record("confirm", tracing::field::debug(confirm));
        let _enter = self.span.enter();
        match confirm {
            ConfirmResponse::Ack => tracing::debug!("Publish confirmed"),
            ConfirmResponse::Reject | ConfirmResponse::Return => {
                tracing::warn!(?confirm, "Publish not accepted by broker")
            }
        }
    }
}

impl ConsumerTracing for SpanTracing {
    fn create(&self, delivery: &DeliveryInfo<'_>) -> Box<dyn TracingContext> {
        let span = tracing::info_span!(
            "amqp.consume",
            queue = %delivery.queue,
            exchange = %delivery.exchange,
            routing_key = %delivery.routing_key,
            consumer_tag = %delivery.consumer_tag,
            delivery_tag = delivery.delivery_tag,
            vhost = %delivery.vhost,
        );
        Box::new(SpanContext { _span: span })
    }
}

impl ProducerTracing for SpanTracing {
    fn create(
        &self,
        publish: &PublishInfo<'_>,
        _headers: &mut FieldTable,
    ) -> Box<dyn ProducerTracingContext> {
        let span = tracing::info_span!(
            "amqp.publish",
            exchange = %publish.exchange,
            routing_key = %publish.routing_key,
            vhost = %publish.vhost,
            confirm = tracing::field::Empty,
        );
        Box::new(PublishSpanContext { span })
    }
}
