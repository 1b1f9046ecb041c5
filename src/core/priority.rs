//! Priority-tagged work items
//!
//! [`PriorityTask`] orders by its numeric priority, so placing it in a
//! max-heap queue (`BinaryHeap`) runs larger priorities first.
//!
//! Ties between equal priorities are resolved by the heap, not by insertion
//! order. Callers that need FIFO-within-priority should encode a tiebreaker
//! in their own work item type.

use super::job::{Thunk, WorkItem};
use std::cmp::Ordering;
use std::fmt;

/// A work item with an associated priority (higher runs first)
pub struct PriorityTask {
    job: Thunk,
    priority: usize,
}

impl PriorityTask {
    /// Create a priority task from a closure
    pub fn new<F>(priority: usize, f: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            job: Box::new(f),
            priority,
        }
    }

    /// Get the priority of this task
    pub fn priority(&self) -> usize {
        self.priority
    }
}

impl fmt::Debug for PriorityTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PriorityTask")
            .field("priority", &self.priority)
            .finish()
    }
}

impl WorkItem for PriorityTask {
    type Params = usize;

    fn with_params(job: Thunk, priority: usize) -> Self {
        Self { job, priority }
    }

    fn execute(self) {
        (self.job)()
    }

    fn kind(&self) -> &str {
        "PriorityTask"
    }
}

impl PartialEq for PriorityTask {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority
    }
}

impl Eq for PriorityTask {}

impl PartialOrd for PriorityTask {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PriorityTask {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority.cmp(&other.priority)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BinaryHeap;

    #[test]
    fn test_priority_ordering() {
        let low = PriorityTask::new(1, || {});
        let high = PriorityTask::new(8, || {});

        assert!(high > low);
        assert_eq!(low.priority(), 1);
    }

    #[test]
    fn test_default_priority_is_zero() {
        let task = PriorityTask::from_fn(Box::new(|| {}));
        assert_eq!(task.priority(), 0);
        assert_eq!(task.kind(), "PriorityTask");
    }

    #[test]
    fn test_heap_pops_highest_first() {
        let mut heap = BinaryHeap::new();
        for p in [3, 9, 1, 5] {
            heap.push(PriorityTask::new(p, || {}));
        }

        let order: Vec<usize> = std::iter::from_fn(|| heap.pop().map(|t| t.priority())).collect();
        assert_eq!(order, vec![9, 5, 3, 1]);
    }
}
