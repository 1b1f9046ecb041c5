//! Tracing integration for observability.
//!
//! Available with the `tracing` feature. Workers run inside a `worker` span
//! and every item inside a `task` span; the [`metrics`] functions emit
//! trace-level events that metrics layers can aggregate.
//!
//! # Example
//!
//! ```rust
//! use rust_work_pool::prelude::*;
//! use rust_work_pool::tracing::TracedTask;
//! use std::collections::VecDeque;
//!
//! # fn main() -> Result<()> {
//! type TracedPool = ThreadPool<TracedTask<Task>, VecDeque<TracedTask<Task>>>;
//! let pool = TracedPool::with_queue(PoolConfig::new(4), VecDeque::new())?;
//!
//! let span = tracing::info_span!("request", id = 7);
//! let _guard = span.enter();
//! // Runs inside `request` on the worker thread.
//! let handled = pool.submit(|| {
//!     tracing::info!("handled");
//!     true
//! });
//! assert!(handled.wait()?);
//! # Ok(())
//! # }
//! ```

use crate::core::{Thunk, WorkItem};

/// A work item wrapper that propagates tracing context across threads.
///
/// The span current at construction (on the submitting thread) is entered
/// while the inner item executes on the worker.
pub struct TracedTask<T: WorkItem> {
    inner: T,
    span: tracing::Span,
}

impl<T: WorkItem> TracedTask<T> {
    /// Wrap `inner`, capturing the current span
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            span: tracing::Span::current(),
        }
    }

    /// Wrap `inner` with a specific span
    pub fn with_span(inner: T, span: tracing::Span) -> Self {
        Self { inner, span }
    }
}

impl<T: WorkItem> WorkItem for TracedTask<T> {
    type Params = T::Params;

    fn with_params(job: Thunk, params: Self::Params) -> Self {
        Self::new(T::with_params(job, params))
    }

    fn execute(self) {
        let _guard = self.span.enter();
        self.inner.execute();
    }

    fn kind(&self) -> &str {
        self.inner.kind()
    }
}

impl<T: WorkItem + PartialEq> PartialEq for TracedTask<T> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<T: WorkItem + Eq> Eq for TracedTask<T> {}

impl<T: WorkItem + Ord> PartialOrd for TracedTask<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: WorkItem + Ord> Ord for TracedTask<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.inner.cmp(&other.inner)
    }
}

/// Metrics recording functions for observability.
///
/// These functions emit tracing events that can be consumed by
/// metrics collection systems like Prometheus via tracing-opentelemetry.
pub mod metrics {
    use std::time::Duration;

    /// Records a task submission event.
    #[inline]
    pub fn record_submission(queue_depth: usize) {
        tracing::trace!(
            counter.tasks_submitted = 1,
            gauge.queue_depth = queue_depth as i64,
            "task submitted"
        );
    }

    /// Records task completion with timing.
    #[inline]
    pub fn record_completion(duration: Duration) {
        tracing::trace!(
            counter.tasks_completed = 1,
            histogram.task_duration_ms = duration.as_millis() as u64,
            "task completed"
        );
    }

    /// Records a task panic that reached the worker.
    #[inline]
    pub fn record_panic(duration: Duration) {
        tracing::trace!(
            counter.tasks_panicked = 1,
            histogram.task_duration_ms = duration.as_millis() as u64,
            "task panicked"
        );
    }

    /// Records pool shutdown.
    #[inline]
    pub fn record_pool_shutdown(tasks_completed: u64, tasks_abandoned: usize) {
        tracing::info!(
            tasks_completed = tasks_completed,
            tasks_abandoned = tasks_abandoned,
            "work pool shutdown complete"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{PriorityTask, Task};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_traced_task_executes() {
        let executed = Arc::new(AtomicBool::new(false));
        let executed_clone = Arc::clone(&executed);

        let traced = TracedTask::new(Task::new(move || {
            executed_clone.store(true, Ordering::SeqCst);
        }));
        traced.execute();

        assert!(executed.load(Ordering::SeqCst));
    }

    #[test]
    fn test_traced_task_preserves_kind_and_order() {
        let low = TracedTask::<PriorityTask>::with_params(Box::new(|| {}), 1);
        let high = TracedTask::<PriorityTask>::with_params(Box::new(|| {}), 9);

        assert_eq!(low.kind(), "PriorityTask");
        assert!(high > low);
    }
}
