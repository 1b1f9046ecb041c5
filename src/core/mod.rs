//! Core types and traits for the work pool

pub mod cancellation;
pub mod error;
pub mod handle;
pub mod job;
pub mod priority;

pub use cancellation::{CancellationReason, CancellationToken, WorkerHandle};
pub use error::{Result, ThreadError};
#[cfg(feature = "async")]
pub use handle::AsyncTaskHandle;
pub use handle::TaskHandle;
pub use job::{Task, Thunk, WorkItem};
pub use priority::PriorityTask;
