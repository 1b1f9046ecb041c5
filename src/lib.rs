//! # Rust Work Pool
//!
//! A thread pool whose workers consume interchangeable work items from a
//! pluggable queue discipline.
//!
//! ## Features
//!
//! - **Pluggable Queues**: FIFO (`VecDeque`), priority (`BinaryHeap`), LIFO
//!   (`Vec`) or any container implementing [`TaskQueue`]
//! - **Pause / Resume**: Stop dequeuing without losing queued work
//! - **Result Handles**: Block on a [`TaskHandle`], or fire and forget
//! - **Runtime Scaling**: Add workers and stop them individually
//! - **Panic Isolation**: A panicking task never takes down its worker
//!
//! ## Quick Start
//!
//! ```rust
//! use rust_work_pool::prelude::*;
//!
//! # fn main() -> Result<()> {
//! let pool = ThreadPool::with_threads(4)?;
//!
//! // Result-bearing submission
//! let sum = pool.submit(|| (1..=10).sum::<u32>());
//! assert_eq!(sum.wait()?, 55);
//!
//! // Fire-and-forget
//! for i in 0..10 {
//!     pool.execute(move || println!("Task {} executing", i));
//! }
//!
//! // Dropping the pool joins the workers
//! # Ok(())
//! # }
//! ```
//!
//! ## Pausing
//!
//! ```rust
//! use rust_work_pool::prelude::*;
//!
//! # fn main() -> Result<()> {
//! let pool = ThreadPool::with_threads(2)?;
//! pool.pause();
//!
//! let a = pool.submit_call(|x: i32| x + 1, 1);
//! let b = pool.submit_call(|x: i32| x - 1, 1);
//! assert_eq!(pool.tasks(), 2);
//!
//! pool.resume();
//! assert_eq!(a.wait()?, 2);
//! assert_eq!(b.wait()?, 0);
//! # Ok(())
//! # }
//! ```
//!
//! ## Priority Scheduling
//!
//! ```rust
//! use rust_work_pool::prelude::*;
//! use std::collections::BinaryHeap;
//!
//! # fn main() -> Result<()> {
//! let config = PoolConfig::new(1).with_paused(true);
//! let pool = PriorityPool::with_queue(config, BinaryHeap::new())?;
//!
//! let low = pool.submit_with(1, || "low");
//! let high = pool.submit_with(9, || "high");
//! pool.resume();
//!
//! assert_eq!(high.wait()?, "high");
//! assert_eq!(low.wait()?, "low");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod core;
pub mod pool;
pub mod prelude;
pub mod queue;
#[cfg(feature = "tracing")]
pub mod tracing;

#[cfg(feature = "async")]
pub use self::core::AsyncTaskHandle;
pub use self::core::{
    CancellationReason, CancellationToken, PriorityTask, Result, Task, TaskHandle, ThreadError,
    Thunk, WorkItem, WorkerHandle,
};
pub use pool::{PanicHandler, PoolConfig, PoolStats, PriorityPool, ThreadPool};
pub use queue::TaskQueue;
