//! Priority scheduling example
//!
//! Queues work while paused, then lets a single worker drain it in
//! descending priority order.
//!
//! Run with: cargo run --example priority_pool

use rust_work_pool::prelude::*;
use std::collections::BinaryHeap;

fn main() -> Result<()> {
    env_logger::init();
    println!("=== Rust Work Pool - Priority Example ===\n");

    let config = PoolConfig::new(1)
        .with_thread_name_prefix("prio")
        .with_paused(true);
    let pool = PriorityPool::with_queue(config, BinaryHeap::new())?;

    let handles: Vec<_> = [1usize, 2, 3, 6, 4, 5]
        .into_iter()
        .map(|priority| {
            pool.submit_with(priority, move || {
                println!("   running priority {}", priority);
                priority
            })
        })
        .collect();

    // Emplaced items carry their own priority
    pool.emplace(PriorityTask::new(10, || println!("   running emplaced priority 10")));

    println!("Queued {} items, resuming:", pool.tasks());
    pool.resume();

    for handle in handles {
        handle.wait()?;
    }

    println!("\n=== Example completed successfully ===");
    Ok(())
}
