//! Point-in-time pool statistics

use serde::{Deserialize, Serialize};

/// Snapshot of a pool's counters
///
/// Every field is read independently, so a snapshot taken while tasks are
/// running may not be internally consistent. Use it for observability only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolStats {
    /// Tracked worker threads, including stopped ones not yet reaped
    pub workers: usize,
    /// Workers reaped by `cleanup` that are still finishing their work
    pub retiring: usize,
    /// Items waiting in the queue
    pub queued: usize,
    /// Whether dequeuing is paused
    pub paused: bool,
    /// Items handed to the queue since creation
    pub submitted: u64,
    /// Items that ran to completion on a worker
    pub completed: u64,
    /// Items whose panic reached the worker (fire-and-forget or emplaced)
    pub panicked: u64,
    /// Items discarded unrun when the pool was dropped
    pub abandoned: u64,
}

impl PoolStats {
    /// Items submitted but not yet finished or discarded
    pub fn outstanding(&self) -> u64 {
        self.submitted
            .saturating_sub(self.completed + self.panicked + self.abandoned)
    }
}
