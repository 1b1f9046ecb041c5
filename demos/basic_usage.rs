//! Basic work pool usage example
//!
//! Demonstrates pool creation, result handles, fire-and-forget tasks,
//! pausing and statistics.
//!
//! Run with: cargo run --example basic_usage

use rust_work_pool::prelude::*;
use std::thread;
use std::time::Duration;

fn main() -> Result<()> {
    env_logger::init();
    println!("=== Rust Work Pool - Basic Usage Example ===\n");

    let pool = ThreadPool::with_threads(4)?;
    println!("1. Created pool with {} workers", pool.size());

    println!("\n2. Submitting result-bearing tasks:");
    let handles: Vec<_> = (1..=5u64)
        .map(|n| pool.submit(move || (1..=n).product::<u64>()))
        .collect();
    for (n, handle) in (1..=5).zip(handles) {
        println!("   {}! = {}", n, handle.wait()?);
    }

    println!("\n3. Fire-and-forget tasks:");
    for i in 0..5 {
        pool.execute(move || {
            println!(
                "   Task {} executing on {:?}",
                i,
                thread::current().name().unwrap_or("?")
            );
        });
    }
    thread::sleep(Duration::from_millis(50));

    println!("\n4. Pausing:");
    pool.pause();
    let a = pool.submit_call(|x: i32| x + 1, 1);
    let b = pool.submit_call(|x: i32| x - 1, 1);
    println!("   Paused with {} tasks queued", pool.tasks());
    pool.resume();
    println!("   Resumed: a = {}, b = {}", a.wait()?, b.wait()?);

    println!("\n5. Panics are contained:");
    match pool.submit(|| -> u32 { panic!("bad input") }).wait() {
        Ok(_) => println!("   unexpected success"),
        Err(e) => println!("   {}", e),
    }

    println!("\n6. Statistics:");
    let stats = pool.stats();
    println!("   Submitted: {}", stats.submitted);
    println!("   Completed: {}", stats.completed);
    println!("   Queued:    {}", stats.queued);

    println!("\n7. Dropping the pool joins its workers");
    drop(pool);

    println!("\n=== Example completed successfully ===");
    Ok(())
}
