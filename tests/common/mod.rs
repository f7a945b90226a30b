//! Shared fixtures for integration tests.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use amqp_context_policy::error::ExecutorError;
use amqp_context_policy::observability::metrics::{MetricPublisher, MetricTags};
use amqp_context_policy::policy::{Executor, Job};

/// Records every metric it receives.
#[allow(dead_code)]
#[derive(Default)]
pub struct RecordingPublisher {
    pub published: Mutex<Vec<(String, f64)>>,
}

impl RecordingPublisher {
    #[allow(dead_code)]
    fn record(&self, name: &str, value: f64) {
        self.published.lock().unwrap().push((name.to_string(), value));
    }
}

impl MetricPublisher for RecordingPublisher {
    fn publish_gauge(&self, name: &str, value: f64, _tags: &MetricTags) {
        self.record(name, value);
    }

    fn publish_counter(&self, name: &str, value: f64, _tags: &MetricTags) {
        self.record(name, value);
    }

    fn publish_summary(&self, name: &str, value: f64, _tags: &MetricTags) {
        self.record(name, value);
    }

    fn publish_distribution(&self, name: &str, value: f64, _tags: &MetricTags) {
        self.record(name, value);
    }
}

/// Runs jobs inline and counts them. Can be switched off.
#[allow(dead_code)]
pub struct InlineExecutor {
    pub accepting: AtomicBool,
    pub executed: AtomicUsize,
}

impl InlineExecutor {
    #[allow(dead_code)]
    pub fn new() -> Self {
        Self {
            accepting: AtomicBool::new(true),
            executed: AtomicUsize::new(0),
        }
    }

    #[allow(dead_code)]
    pub fn shut_down(&self) {
        self.accepting.store(false, Ordering::SeqCst);
    }
}

impl Executor for InlineExecutor {
    fn execute(&self, job: Job) -> Result<(), ExecutorError> {
        if !self.is_accepting() {
            return Err(ExecutorError::Rejected("shut down".into()));
        }
        job();
        self.executed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn is_accepting(&self) -> bool {
        self.accepting.load(Ordering::SeqCst)
    }
}

/// Write `content` to a fresh file under the temp dir.
#[allow(dead_code)]
pub fn write_policy_file(name: &str, content: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("{}-{}.toml", name, std::process::id()));
    std::fs::write(&path, content).unwrap();
    path
}
