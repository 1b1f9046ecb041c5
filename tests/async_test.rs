//! Tests for awaitable result handles

#![cfg(feature = "async")]

use rust_work_pool::prelude::*;
use std::collections::BinaryHeap;

#[test]
fn test_submit_async_resolves() {
    let pool = ThreadPool::with_threads(2).expect("Failed to create pool");

    let handle = pool.submit_async(|| 21 * 2);
    let value = tokio_test::block_on(handle).expect("task failed");
    assert_eq!(value, 42);
}

#[test]
fn test_submit_async_many() {
    let pool = ThreadPool::with_threads(4).expect("Failed to create pool");
    let handles: Vec<_> = (0..50u64).map(|i| pool.submit_async(move || i * i)).collect();

    let sum = tokio_test::block_on(async {
        let mut sum = 0;
        for handle in handles {
            sum += handle.await.expect("task failed");
        }
        sum
    });
    assert_eq!(sum, (0..50u64).map(|i| i * i).sum::<u64>());
}

#[test]
fn test_submit_async_panic() {
    let pool = ThreadPool::with_threads(1).expect("Failed to create pool");

    let handle = pool.submit_async(|| -> u8 { panic!("async failure") });
    match tokio_test::block_on(handle) {
        Err(ThreadError::TaskPanicked { message, .. }) => assert_eq!(message, "async failure"),
        other => panic!("expected a captured panic, got {:?}", other),
    }
}

#[test]
fn test_submit_async_abandoned_on_drop() {
    let pool = ThreadPool::with_threads(1).expect("Failed to create pool");
    pool.pause();
    let handle = pool.submit_async(|| "never");
    drop(pool);

    let err = tokio_test::block_on(handle).expect_err("pool dropped before running");
    assert!(err.is_abandoned());
}

#[test]
fn test_submit_async_on_priority_pool() {
    let pool = PriorityPool::with_queue(PoolConfig::new(1), BinaryHeap::new())
        .expect("Failed to create pool");

    let handle = pool.submit_async(|| String::from("prioritised"));
    assert_eq!(
        tokio_test::block_on(handle).expect("task failed"),
        "prioritised"
    );
}
