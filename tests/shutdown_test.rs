//! Tests for pool destruction

use rust_work_pool::prelude::*;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

#[test]
fn test_drop_idle_pool() {
    let start = Instant::now();
    let pool = ThreadPool::with_threads(8).expect("Failed to create pool");
    drop(pool);
    assert!(start.elapsed() < Duration::from_secs(2));
}

#[test]
fn test_drop_abandons_queued_work() {
    let pool = ThreadPool::with_threads(2).expect("Failed to create pool");
    pool.pause();

    let ran = Arc::new(AtomicUsize::new(0));
    let handles: Vec<_> = (0..1000)
        .map(|_| {
            let ran = Arc::clone(&ran);
            pool.submit(move || {
                thread::sleep(Duration::from_millis(10));
                ran.fetch_add(1, Ordering::SeqCst);
            })
        })
        .collect();
    assert_eq!(pool.tasks(), 1000);

    // Running them all would take seconds; drop must not wait for them
    let start = Instant::now();
    drop(pool);
    assert!(start.elapsed() < Duration::from_secs(1));
    assert_eq!(ran.load(Ordering::SeqCst), 0);

    for handle in handles {
        let err = handle.wait().expect_err("queued task should be abandoned");
        assert!(err.is_abandoned());
    }
}

#[test]
fn test_drop_abandons_unpaused_backlog() {
    let pool = ThreadPool::with_threads(1).expect("Failed to create pool");

    let started = Arc::new(AtomicBool::new(false));
    let started_clone = Arc::clone(&started);
    let blocker = pool.submit(move || {
        started_clone.store(true, Ordering::SeqCst);
        thread::sleep(Duration::from_millis(100));
        "blocker"
    });
    while !started.load(Ordering::SeqCst) {
        thread::sleep(Duration::from_millis(1));
    }

    let backlog: Vec<_> = (0..100).map(|i| pool.submit(move || i)).collect();

    let start = Instant::now();
    drop(pool);
    let elapsed = start.elapsed();

    // Drop waited for the running task, not the backlog
    assert_eq!(blocker.wait().expect("task failed"), "blocker");
    assert!(elapsed < Duration::from_secs(1));

    let abandoned = backlog
        .into_iter()
        .filter(|handle| matches!(handle.try_wait(), Some(Err(ThreadError::Abandoned { .. }))))
        .count();
    // A worker only checks for shutdown between items, so at most one more
    // backlog item may have been picked up before it saw the flag.
    assert!(abandoned >= 99, "only {} of 100 abandoned", abandoned);
}

#[test]
fn test_drop_waits_for_running_task() {
    let pool = ThreadPool::with_threads(1).expect("Failed to create pool");
    let finished = Arc::new(AtomicBool::new(false));
    let started = Arc::new(AtomicBool::new(false));

    let finished_clone = Arc::clone(&finished);
    let started_clone = Arc::clone(&started);
    pool.execute(move || {
        started_clone.store(true, Ordering::SeqCst);
        thread::sleep(Duration::from_millis(50));
        finished_clone.store(true, Ordering::SeqCst);
    });
    while !started.load(Ordering::SeqCst) {
        thread::sleep(Duration::from_millis(1));
    }

    drop(pool);
    assert!(finished.load(Ordering::SeqCst));
}

#[test]
fn test_wait_timeout_then_abandoned() {
    let pool = ThreadPool::with_threads(1).expect("Failed to create pool");
    pool.pause();
    let handle = pool.submit(|| 1);

    assert!(matches!(
        handle.wait_timeout(Duration::from_millis(20)),
        Err(ThreadError::WaitTimeout { .. })
    ));

    drop(pool);
    assert!(handle
        .wait_timeout(Duration::from_millis(20))
        .expect_err("pool is gone")
        .is_abandoned());
}

#[test]
fn test_drop_with_added_and_cancelled_workers() {
    let pool = ThreadPool::with_threads(2).expect("Failed to create pool");
    let kept = pool.add_thread().expect("Failed to add thread");
    let cancelled = pool.add_thread().expect("Failed to add thread");
    cancelled.cancel();

    let value = pool.submit(|| 9);
    assert_eq!(value.wait().expect("task failed"), 9);

    drop(pool);
    assert!(kept.is_cancelled());
    assert_eq!(kept.token().reason(), Some(CancellationReason::PoolShutdown));
    assert_eq!(cancelled.token().reason(), Some(CancellationReason::Manual));
}
