//! Custom queue discipline example
//!
//! Demonstrates plugging a user-defined container into the pool through the
//! `TaskQueue` trait, and the built-in LIFO discipline.
//!
//! Run with: cargo run --example custom_queue

use rust_work_pool::prelude::*;
use std::collections::VecDeque;

/// A FIFO queue that counts every push and pop.
pub struct CountingQueue<T> {
    items: VecDeque<T>,
    pushes: usize,
    pops: usize,
}

impl<T> Default for CountingQueue<T> {
    fn default() -> Self {
        Self {
            items: VecDeque::new(),
            pushes: 0,
            pops: 0,
        }
    }
}

impl<T: Send + 'static> TaskQueue<T> for CountingQueue<T> {
    fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn push(&mut self, item: T) {
        self.pushes += 1;
        log::trace!("push #{}: len={}", self.pushes, self.items.len() + 1);
        self.items.push_back(item);
    }

    fn pop(&mut self) -> Option<T> {
        let item = self.items.pop_front();
        if item.is_some() {
            self.pops += 1;
            log::trace!("pop #{}: len={}", self.pops, self.items.len());
        }
        item
    }

    fn len(&self) -> usize {
        self.items.len()
    }
}

fn main() -> Result<()> {
    env_logger::init();
    println!("=== Rust Work Pool - Custom Queue Example ===\n");

    println!("1. Counting FIFO queue:");
    let pool: ThreadPool<Task, CountingQueue<Task>> =
        ThreadPool::with_queue(PoolConfig::new(2), CountingQueue::default())?;
    let handles: Vec<_> = (0..5).map(|i| pool.submit(move || i * 10)).collect();
    for handle in handles {
        println!("   result {}", handle.wait()?);
    }
    drop(pool);

    println!("\n2. LIFO queue (Vec), single paused worker:");
    let config = PoolConfig::new(1).with_paused(true);
    let pool: ThreadPool<Task, Vec<Task>> = ThreadPool::with_queue(config, Vec::new())?;
    let handles: Vec<_> = (0..5)
        .map(|i| {
            pool.submit(move || {
                println!("   running item {}", i);
            })
        })
        .collect();
    pool.resume();
    for handle in handles {
        handle.wait()?;
    }

    println!("\n=== Example completed successfully ===");
    Ok(())
}
