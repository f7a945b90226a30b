//! Execution resource for async callbacks.
//!
//! # Responsibilities
//! - Describe the executor interface the connection layer runs callbacks on
//! - Describe the default pool the context creates when none is supplied
//!
//! # Design Decisions
//! - A caller-supplied executor is borrowed, never owned; the `'r` lifetime
//!   on the policy ties the snapshot to it
//! - Liveness is checked once, at handoff

use std::fmt;
use std::time::Duration;

use crate::error::ExecutorError;

/// Unit of work submitted to an executor.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Thread-pool-like facility that runs client callbacks.
pub trait Executor: Send + Sync {
    /// Queue `job` for execution.
    fn execute(&self, job: Job) -> Result<(), ExecutorError>;

    /// Whether the executor currently accepts jobs.
    fn is_accepting(&self) -> bool {
        true
    }
}

/// Jobs go to the runtime's blocking pool, since client callbacks may block.
impl Executor for tokio::runtime::Handle {
    fn execute(&self, job: Job) -> Result<(), ExecutorError> {
        self.spawn_blocking(job);
        Ok(())
    }
}

/// Sizing of the pool a context creates for itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreadPoolSettings {
    pub min_threads: usize,
    pub max_threads: usize,
    pub max_idle: Duration,
}

impl ThreadPoolSettings {
    pub const DEFAULT_MIN_THREADS: usize = 1;
    pub const DEFAULT_MAX_THREADS: usize = 5;
    pub const DEFAULT_MAX_IDLE: Duration = Duration::from_millis(100);
}

impl Default for ThreadPoolSettings {
    fn default() -> Self {
        Self {
            min_threads: Self::DEFAULT_MIN_THREADS,
            max_threads: Self::DEFAULT_MAX_THREADS,
            max_idle: Self::DEFAULT_MAX_IDLE,
        }
    }
}

/// Where async callbacks run.
#[derive(Clone, Copy)]
pub enum ExecutionResource<'r> {
    /// The context creates and owns a pool with these settings.
    Default(ThreadPoolSettings),
    /// A caller-owned executor that must outlive the context.
    Borrowed(&'r dyn Executor),
}

impl<'r> ExecutionResource<'r> {
    pub fn is_borrowed(&self) -> bool {
        matches!(self, ExecutionResource::Borrowed(_))
    }

    /// The borrowed executor, if one was supplied.
    pub fn executor(&self) -> Option<&'r dyn Executor> {
        match self {
            ExecutionResource::Default(_) => None,
            ExecutionResource::Borrowed(e) => Some(*e),
        }
    }
}

impl Default for ExecutionResource<'_> {
    fn default() -> Self {
        ExecutionResource::Default(ThreadPoolSettings::default())
    }
}

impl fmt::Debug for ExecutionResource<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionResource::Default(settings) => f.debug_tuple("Default").field(settings).finish(),
            ExecutionResource::Borrowed(_) => f.write_str("Borrowed(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_default_resource() {
        let resource = ExecutionResource::default();
        assert!(!resource.is_borrowed());
        assert!(resource.executor().is_none());
        match resource {
            ExecutionResource::Default(s) => {
                assert_eq!(s.min_threads, 1);
                assert_eq!(s.max_threads, 5);
                assert_eq!(s.max_idle, Duration::from_millis(100));
            }
            ExecutionResource::Borrowed(_) => unreachable!(),
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_tokio_handle_executes() {
        let handle = tokio::runtime::Handle::current();
        let ran = Arc::new(AtomicBool::new(false));
        let flag = ran.clone();
        let (tx, rx) = tokio::sync::oneshot::channel();

        handle
            .execute(Box::new(move || {
                flag.store(true, Ordering::SeqCst);
                let _ = tx.send(());
            }))
            .unwrap();

        rx.await.unwrap();
        assert!(ran.load(Ordering::SeqCst));
        assert!(Executor::is_accepting(&handle));
    }
}
