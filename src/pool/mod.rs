//! Thread pool and worker implementations

pub mod stats;
pub mod thread_pool;
pub(crate) mod worker;

pub use stats::PoolStats;
pub use thread_pool::{PoolConfig, PriorityPool, ThreadPool};
pub use worker::PanicHandler;
