//! Notification callbacks.
//!
//! Each event class is either `Disabled` or carries a shared handler. Which
//! thread a handler runs on, and in what order, is decided by the connection
//! layer.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// An optional, shareable notification handler.
pub enum Callback<F: ?Sized> {
    /// Notifications of this class are dropped.
    Disabled,
    Handler(Arc<F>),
}

impl<F: ?Sized> Callback<F> {
    pub fn is_enabled(&self) -> bool {
        matches!(self, Callback::Handler(_))
    }

    pub fn handler(&self) -> Option<&Arc<F>> {
        match self {
            Callback::Disabled => None,
            Callback::Handler(h) => Some(h),
        }
    }
}

impl<F: ?Sized> Clone for Callback<F> {
    fn clone(&self) -> Self {
        match self {
            Callback::Disabled => Callback::Disabled,
            Callback::Handler(h) => Callback::Handler(Arc::clone(h)),
        }
    }
}

impl<F: ?Sized> Default for Callback<F> {
    fn default() -> Self {
        Callback::Disabled
    }
}

impl<F: ?Sized> fmt::Debug for Callback<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Callback::Disabled => f.write_str("Disabled"),
            Callback::Handler(_) => f.write_str("Handler(..)"),
        }
    }
}

/// Called with the error text and AMQP reply code when the broker closes a
/// channel or connection, or a connection attempt keeps failing.
pub type ErrorCallback = Callback<dyn Fn(&str, i32) + Send + Sync>;

/// Called when a channel or connection is restored.
pub type SuccessCallback = Callback<dyn Fn() + Send + Sync>;

/// Called by the connection monitor with messages outstanding for longer
/// than the processing timeout.
pub type HungMessageCallback = Callback<dyn Fn(&[HungMessage]) + Send + Sync>;

/// A delivered message that has not been acknowledged in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HungMessage {
    pub connection_name: String,
    pub queue: String,
    pub consumer_tag: String,
    pub delivery_tag: u64,
    /// Time since delivery when the monitor noticed it.
    pub outstanding_for: Duration,
}

impl ErrorCallback {
    pub fn new(f: impl Fn(&str, i32) + Send + Sync + 'static) -> Self {
        Callback::Handler(Arc::new(f))
    }

    pub fn notify(&self, error_text: &str, error_code: i32) {
        if let Callback::Handler(h) = self {
            h(error_text, error_code);
        }
    }
}

impl SuccessCallback {
    pub fn new(f: impl Fn() + Send + Sync + 'static) -> Self {
        Callback::Handler(Arc::new(f))
    }

    pub fn notify(&self) {
        if let Callback::Handler(h) = self {
            h();
        }
    }
}

impl HungMessageCallback {
    pub fn new(f: impl Fn(&[HungMessage]) + Send + Sync + 'static) -> Self {
        Callback::Handler(Arc::new(f))
    }

    pub fn notify(&self, hung: &[HungMessage]) {
        if let Callback::Handler(h) = self {
            h(hung);
        }
    }
}
