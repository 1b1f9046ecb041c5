//! Convenient re-exports for common types and traits

#[cfg(feature = "async")]
pub use crate::core::AsyncTaskHandle;
pub use crate::core::{
    CancellationReason, CancellationToken, PriorityTask, Result, Task, TaskHandle, ThreadError, WorkItem,
    WorkerHandle,
};
pub use crate::pool::{PoolConfig, PoolStats, PriorityPool, ThreadPool};
pub use crate::queue::TaskQueue;
