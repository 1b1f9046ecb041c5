//! Worker thread implementation and the state workers share with the pool

use crate::core::error::panic_message;
use crate::core::{CancellationToken, Result, ThreadError, WorkItem};
use crate::pool::stats::PoolStats;
use crate::queue::TaskQueue;
use parking_lot::{Condvar, Mutex};
use std::marker::PhantomData;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::thread;
use std::time::Instant;

#[cfg(feature = "tracing")]
use tracing::{debug, span, Level};

/// Hook receiving faults from tasks that have no result channel
pub type PanicHandler = Arc<dyn Fn(&ThreadError) + Send + Sync>;

/// State shared by the pool and its workers
///
/// `queue` and `available` form one lock/condvar pair. The pause and shutdown
/// flags are only written while holding the queue lock, so a worker that saw
/// them unset under the lock is guaranteed to be waiting when the change is
/// signalled.
pub(crate) struct Shared<T, Q> {
    queue: Mutex<Q>,
    available: Condvar,
    paused: AtomicBool,
    shutdown: AtomicBool,
    panic_handler: PanicHandler,
    submitted: AtomicU64,
    completed: AtomicU64,
    panicked: AtomicU64,
    abandoned: AtomicU64,
    _item: PhantomData<fn() -> T>,
}

impl<T, Q> Shared<T, Q>
where
    T: WorkItem,
    Q: TaskQueue<T>,
{
    pub(crate) fn new(queue: Q, paused: bool, panic_handler: PanicHandler) -> Self {
        Self {
            queue: Mutex::new(queue),
            available: Condvar::new(),
            paused: AtomicBool::new(paused),
            shutdown: AtomicBool::new(false),
            panic_handler,
            submitted: AtomicU64::new(0),
            completed: AtomicU64::new(0),
            panicked: AtomicU64::new(0),
            abandoned: AtomicU64::new(0),
            _item: PhantomData,
        }
    }

    /// Queue an item and wake one idle worker
    pub(crate) fn enqueue(&self, item: T) {
        #[cfg(feature = "tracing")]
        let depth;
        {
            let mut queue = self.queue.lock();
            queue.push(item);
            #[cfg(feature = "tracing")]
            {
                depth = queue.len();
            }
        }
        self.submitted.fetch_add(1, Ordering::Relaxed);
        self.available.notify_one();

        #[cfg(feature = "tracing")]
        crate::tracing::metrics::record_submission(depth);
    }

    pub(crate) fn pause(&self) {
        let _queue = self.queue.lock();
        self.paused.store(true, Ordering::Release);
    }

    pub(crate) fn resume(&self) {
        {
            let _queue = self.queue.lock();
            self.paused.store(false, Ordering::Release);
        }
        self.available.notify_all();
    }

    pub(crate) fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Acquire)
    }

    pub(crate) fn queued(&self) -> usize {
        self.queue.lock().len()
    }

    /// Wake every waiting worker so it re-checks its stop condition
    pub(crate) fn wake_all(&self) {
        drop(self.queue.lock());
        self.available.notify_all();
    }

    /// Make every worker exit at its next check, regardless of queued work
    pub(crate) fn begin_shutdown(&self) {
        {
            let _queue = self.queue.lock();
            self.shutdown.store(true, Ordering::Release);
        }
        self.available.notify_all();
    }

    /// Drop everything still queued; returns how many items were discarded
    pub(crate) fn discard_pending(&self) -> usize {
        let pending: Vec<T> = {
            let mut queue = self.queue.lock();
            std::iter::from_fn(|| queue.pop()).collect()
        };
        let count = pending.len();
        // Dropped outside the lock: abandoning an item drops its result sender.
        drop(pending);
        self.abandoned.fetch_add(count as u64, Ordering::Relaxed);
        count
    }

    /// Block until there is an item this worker may run, or it should exit
    fn next_item(&self, token: &CancellationToken) -> Option<T> {
        let mut queue = self.queue.lock();
        loop {
            if self.shutdown.load(Ordering::Acquire) {
                return None;
            }

            let paused = self.paused.load(Ordering::Acquire);
            if token.is_cancelled() && (paused || queue.is_empty()) {
                return None;
            }

            if !paused {
                if let Some(item) = queue.pop() {
                    return Some(item);
                }
            }

            self.available.wait(&mut queue);
        }
    }

    pub(crate) fn stats(&self, workers: usize) -> PoolStats {
        PoolStats {
            workers,
            retiring: 0,
            queued: self.queued(),
            paused: self.is_paused(),
            submitted: self.submitted.load(Ordering::Relaxed),
            completed: self.completed.load(Ordering::Relaxed),
            panicked: self.panicked.load(Ordering::Relaxed),
            abandoned: self.abandoned.load(Ordering::Relaxed),
        }
    }
}

/// A worker thread pulling items from the shared queue
#[derive(Debug)]
pub(crate) struct Worker {
    id: usize,
    thread: Option<thread::JoinHandle<()>>,
    token: CancellationToken,
}

impl Worker {
    /// Spawn a worker bound to `token`
    ///
    /// Cancelling the token wakes the pool's idle workers so this one can
    /// observe the request.
    pub(crate) fn spawn<T, Q>(
        id: usize,
        name: String,
        shared: &Arc<Shared<T, Q>>,
        token: CancellationToken,
    ) -> Result<Self>
    where
        T: WorkItem,
        Q: TaskQueue<T>,
    {
        let weak: Weak<Shared<T, Q>> = Arc::downgrade(shared);
        token.on_cancel(move || {
            if let Some(shared) = weak.upgrade() {
                shared.wake_all();
            }
        });

        let shared = Arc::clone(shared);
        let worker_token = token.clone();
        let thread = thread::Builder::new()
            .name(name)
            .spawn(move || Self::run(id, shared, worker_token))
            .map_err(|e| ThreadError::spawn_with_source(id, e))?;

        Ok(Self {
            id,
            thread: Some(thread),
            token,
        })
    }

    pub(crate) fn id(&self) -> usize {
        self.id
    }

    pub(crate) fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Whether the thread has left its loop
    pub(crate) fn is_finished(&self) -> bool {
        self.thread.as_ref().map_or(true, |t| t.is_finished())
    }

    /// Whether this worker is the calling thread
    pub(crate) fn is_current(&self) -> bool {
        self.thread
            .as_ref()
            .is_some_and(|t| t.thread().id() == thread::current().id())
    }

    /// Join the worker thread
    pub(crate) fn join(mut self) -> Result<()> {
        if let Some(thread) = self.thread.take() {
            thread
                .join()
                .map_err(|payload| ThreadError::join(self.id, panic_message(&*payload)))?;
        }
        Ok(())
    }

    /// Main worker loop
    fn run<T, Q>(id: usize, shared: Arc<Shared<T, Q>>, token: CancellationToken)
    where
        T: WorkItem,
        Q: TaskQueue<T>,
    {
        #[cfg(feature = "tracing")]
        let worker_span = span!(Level::DEBUG, "worker", id = id);
        #[cfg(feature = "tracing")]
        let _guard = worker_span.enter();

        log::debug!("worker {} started", id);

        let mut executed: u64 = 0;
        while let Some(item) = shared.next_item(&token) {
            Self::execute_item(id, item, &shared);
            executed += 1;
        }

        #[cfg(feature = "tracing")]
        debug!(tasks_executed = executed, "worker shutting down");

        match token.reason() {
            Some(reason) => log::debug!(
                "worker {} exiting after {} tasks: {}",
                id,
                executed,
                reason
            ),
            None => log::debug!("worker {} exiting after {} tasks", id, executed),
        }
    }

    /// Execute a single item with panic protection
    fn execute_item<T, Q>(id: usize, item: T, shared: &Shared<T, Q>)
    where
        T: WorkItem,
        Q: TaskQueue<T>,
    {
        #[cfg(feature = "tracing")]
        let task_span = span!(Level::DEBUG, "task", kind = %item.kind());
        #[cfg(feature = "tracing")]
        let _task_guard = task_span.enter();

        let start = Instant::now();
        let outcome = catch_unwind(AssertUnwindSafe(|| item.execute()));
        let elapsed = start.elapsed();

        match outcome {
            Ok(()) => {
                shared.completed.fetch_add(1, Ordering::Relaxed);
                #[cfg(feature = "tracing")]
                crate::tracing::metrics::record_completion(elapsed);
            }
            Err(payload) => {
                let err = ThreadError::worker_panic(id, panic_message(&*payload));
                shared.panicked.fetch_add(1, Ordering::Relaxed);
                #[cfg(feature = "tracing")]
                crate::tracing::metrics::record_panic(elapsed);
                #[cfg(not(feature = "tracing"))]
                let _ = elapsed;
                let reported = catch_unwind(AssertUnwindSafe(|| (shared.panic_handler)(&err)));
                if let Err(payload) = reported {
                    log::error!(
                        "panic handler failed on worker {} ({}); original fault: {}",
                        id,
                        panic_message(&*payload),
                        err
                    );
                }
            }
        }
    }
}

/// Default panic handler: report through the `log` facade
pub(crate) fn log_panic(err: &ThreadError) {
    log::error!("{}", err);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Task;
    use std::collections::VecDeque;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    type TestShared = Shared<Task, VecDeque<Task>>;

    fn shared_with_handler(handler: PanicHandler) -> Arc<TestShared> {
        Arc::new(Shared::new(VecDeque::new(), false, handler))
    }

    fn shared() -> Arc<TestShared> {
        shared_with_handler(Arc::new(log_panic))
    }

    fn wait_until(deadline: Duration, mut check: impl FnMut() -> bool) -> bool {
        let start = Instant::now();
        while start.elapsed() < deadline {
            if check() {
                return true;
            }
            thread::sleep(Duration::from_millis(5));
        }
        check()
    }

    #[test]
    fn test_worker_exits_on_cancel() {
        let shared = shared();
        let token = CancellationToken::new();
        let worker = Worker::spawn(0, "test-0".into(), &shared, token.clone())
            .expect("Failed to spawn worker");
        assert_eq!(worker.id(), 0);
        assert!(!worker.is_current());

        token.cancel();
        assert!(wait_until(Duration::from_secs(2), || worker.is_finished()));
        worker.join().expect("Failed to join worker");
    }

    #[test]
    fn test_worker_executes_items() {
        let shared = shared();
        let token = CancellationToken::new();
        let worker = Worker::spawn(1, "test-1".into(), &shared, token.clone())
            .expect("Failed to spawn worker");

        let counter = Arc::new(AtomicUsize::new(0));
        for _ in 0..5 {
            let counter = Arc::clone(&counter);
            shared.enqueue(Task::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }));
        }

        assert!(wait_until(Duration::from_secs(2), || {
            shared.stats(1).completed == 5
        }));
        assert_eq!(counter.load(Ordering::SeqCst), 5);

        token.cancel();
        worker.join().expect("Failed to join worker");
    }

    #[test]
    fn test_worker_survives_panic() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = Arc::clone(&seen);
        let shared = shared_with_handler(Arc::new(move |err: &ThreadError| {
            seen_clone.lock().push(err.to_string());
        }));
        let token = CancellationToken::new();
        let worker = Worker::spawn(2, "test-2".into(), &shared, token.clone())
            .expect("Failed to spawn worker");

        shared.enqueue(Task::new(|| panic!("Intentional panic for testing")));
        let ran = Arc::new(AtomicBool::new(false));
        let ran_clone = Arc::clone(&ran);
        shared.enqueue(Task::new(move || ran_clone.store(true, Ordering::SeqCst)));

        assert!(wait_until(Duration::from_secs(2), || {
            shared.stats(1).completed == 1
        }));
        assert!(ran.load(Ordering::SeqCst));
        assert_eq!(
            seen.lock().clone(),
            vec!["Task panicked on worker thread #2: Intentional panic for testing".to_string()]
        );

        let stats = shared.stats(1);
        assert_eq!(stats.panicked, 1);
        assert_eq!(stats.completed, 1);

        token.cancel();
        worker.join().expect("Failed to join worker");
    }

    #[test]
    fn test_worker_survives_failing_panic_handler() {
        let shared = shared_with_handler(Arc::new(|_: &ThreadError| {
            panic!("handler failed");
        }));
        let token = CancellationToken::new();
        let worker = Worker::spawn(5, "test-5".into(), &shared, token.clone())
            .expect("Failed to spawn worker");

        shared.enqueue(Task::new(|| panic!("first fault")));
        shared.enqueue(Task::new(|| panic!("second fault")));
        let ran = Arc::new(AtomicBool::new(false));
        let ran_clone = Arc::clone(&ran);
        shared.enqueue(Task::new(move || ran_clone.store(true, Ordering::SeqCst)));

        assert!(wait_until(Duration::from_secs(2), || {
            shared.stats(1).completed == 1
        }));
        assert!(ran.load(Ordering::SeqCst));
        assert_eq!(shared.stats(1).panicked, 2);
        assert!(!worker.is_finished());

        token.cancel();
        worker.join().expect("Failed to join worker");
    }

    #[test]
    fn test_cancelled_worker_drains_unpaused_queue() {
        let shared = shared();
        shared.pause();

        let counter = Arc::new(AtomicUsize::new(0));
        for _ in 0..3 {
            let counter = Arc::clone(&counter);
            shared.enqueue(Task::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }));
        }

        let token = CancellationToken::new();
        token.cancel();
        shared.resume();
        let worker = Worker::spawn(3, "test-3".into(), &shared, token)
            .expect("Failed to spawn worker");

        worker.join().expect("Failed to join worker");
        assert_eq!(counter.load(Ordering::SeqCst), 3);
        assert_eq!(shared.queued(), 0);
    }

    #[test]
    fn test_shutdown_leaves_queue_for_discard() {
        let shared = shared();
        shared.pause();
        for _ in 0..4 {
            shared.enqueue(Task::new(|| {}));
        }

        let worker = Worker::spawn(4, "test-4".into(), &shared, CancellationToken::new())
            .expect("Failed to spawn worker");
        shared.begin_shutdown();
        worker.join().expect("Failed to join worker");

        assert_eq!(shared.discard_pending(), 4);
        assert_eq!(shared.stats(0).abandoned, 4);
        assert_eq!(shared.queued(), 0);
    }
}
