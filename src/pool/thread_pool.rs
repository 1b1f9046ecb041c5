//! Thread pool implementation

#[cfg(feature = "async")]
use crate::core::AsyncTaskHandle;
use crate::core::handle::with_result_channel;
use crate::core::{
    CancellationReason, CancellationToken, PriorityTask, Result, Task, TaskHandle, ThreadError,
    WorkItem, WorkerHandle,
};
use crate::pool::stats::PoolStats;
use crate::pool::worker::{log_panic, PanicHandler, Shared, Worker};
use crate::queue::TaskQueue;
use parking_lot::Mutex;
use std::collections::{BinaryHeap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Configuration for thread pool
#[derive(Clone)]
pub struct PoolConfig {
    /// Number of worker threads spawned at construction
    pub num_threads: usize,
    /// Thread name prefix; workers are named `"{prefix}-{id}"`
    pub thread_name_prefix: String,
    /// Start with dequeuing paused
    pub start_paused: bool,
    /// Hook for faults in tasks without a result channel
    panic_handler: Option<PanicHandler>,
}

impl std::fmt::Debug for PoolConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PoolConfig")
            .field("num_threads", &self.num_threads)
            .field("thread_name_prefix", &self.thread_name_prefix)
            .field("start_paused", &self.start_paused)
            .field(
                "panic_handler",
                &self.panic_handler.as_ref().map(|_| "<custom handler>"),
            )
            .finish()
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            num_threads: num_cpus::get(),
            thread_name_prefix: "worker".to_string(),
            start_paused: false,
            panic_handler: None,
        }
    }
}

impl PoolConfig {
    /// Create a new configuration with specified number of threads
    ///
    /// `0` selects the number of CPUs.
    #[must_use]
    pub fn new(num_threads: usize) -> Self {
        Self {
            num_threads: if num_threads == 0 {
                num_cpus::get()
            } else {
                num_threads
            },
            ..Default::default()
        }
    }

    /// Set thread name prefix
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_thread_name_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.thread_name_prefix = prefix.into();
        self
    }

    /// Start the pool paused; queued work waits for [`ThreadPool::resume`]
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_paused(mut self, paused: bool) -> Self {
        self.start_paused = paused;
        self
    }

    /// Route panics from fire-and-forget and emplaced tasks to `handler`
    ///
    /// The default handler logs them at error level.
    ///
    /// # Example
    ///
    /// ```rust
    /// use rust_work_pool::prelude::*;
    ///
    /// let config = PoolConfig::new(2).with_panic_handler(|err| {
    ///     eprintln!("background task failed: {}", err);
    /// });
    /// # let _pool = ThreadPool::with_config(config).unwrap();
    /// ```
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_panic_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&ThreadError) + Send + Sync + 'static,
    {
        self.panic_handler = Some(Arc::new(handler));
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.num_threads == 0 {
            return Err(ThreadError::invalid_config(
                "num_threads",
                "Number of threads must be greater than 0",
            ));
        }
        if self.thread_name_prefix.contains('\0') {
            return Err(ThreadError::invalid_config(
                "thread_name_prefix",
                "Thread names must not contain NUL bytes",
            ));
        }
        Ok(())
    }
}

/// A pool of worker threads consuming work items from a pluggable queue
///
/// `T` is the work item type and `Q` the queue discipline; the defaults give a
/// FIFO pool of plain closures. See [`PriorityPool`] for a max-heap setup.
///
/// # Locking
///
/// The queue and pause flag sit behind one lock and condvar. The tracked
/// worker collection has its own lock, so resizing never contends with task
/// throughput. Neither lock is held while a task runs.
///
/// Workers stopped through a [`WorkerHandle`] leave [`size`](Self::size) at the
/// next [`cleanup`](Self::cleanup). Any that are still finishing work are
/// parked as retiring and joined once they have exited.
///
/// # Drop
///
/// Dropping the pool stops and joins every worker. Items still queued are
/// discarded; their handles resolve with [`ThreadError::Abandoned`]. Drop
/// waits only for tasks already running.
pub struct ThreadPool<T = Task, Q = VecDeque<T>>
where
    T: WorkItem,
    Q: TaskQueue<T>,
{
    shared: Arc<Shared<T, Q>>,
    workers: Mutex<Vec<Worker>>,
    retiring: Mutex<Vec<Worker>>,
    next_worker_id: AtomicUsize,
    thread_name_prefix: String,
}

/// A pool scheduling [`PriorityTask`]s highest priority first
///
/// # Example
///
/// ```
/// use rust_work_pool::prelude::*;
/// use std::collections::BinaryHeap;
///
/// # fn main() -> Result<()> {
/// let pool = PriorityPool::with_queue(PoolConfig::new(1), BinaryHeap::new())?;
/// let urgent = pool.submit_with(10, || "urgent");
/// assert_eq!(urgent.wait()?, "urgent");
/// # Ok(())
/// # }
/// ```
pub type PriorityPool = ThreadPool<PriorityTask, BinaryHeap<PriorityTask>>;

impl<T, Q> std::fmt::Debug for ThreadPool<T, Q>
where
    T: WorkItem,
    Q: TaskQueue<T>,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThreadPool")
            .field("thread_name_prefix", &self.thread_name_prefix)
            .field("stats", &self.stats())
            .finish()
    }
}

impl ThreadPool {
    /// Create a FIFO pool with one worker per CPU
    pub fn new() -> Result<Self> {
        Self::with_config(PoolConfig::default())
    }

    /// Create a FIFO pool with the specified number of threads
    pub fn with_threads(num_threads: usize) -> Result<Self> {
        Self::with_config(PoolConfig::new(num_threads))
    }

    /// Create a FIFO pool with custom configuration
    pub fn with_config(config: PoolConfig) -> Result<Self> {
        Self::with_queue(config, VecDeque::new())
    }
}

impl<T, Q> ThreadPool<T, Q>
where
    T: WorkItem,
    Q: TaskQueue<T>,
{
    /// Create a pool over a specific queue container
    ///
    /// Items already in `queue` are eligible to run as soon as the workers
    /// start (unless the config starts the pool paused).
    pub fn with_queue(config: PoolConfig, queue: Q) -> Result<Self> {
        config.validate()?;

        let panic_handler: PanicHandler = match &config.panic_handler {
            Some(handler) => Arc::clone(handler),
            None => Arc::new(log_panic),
        };

        let pool = Self {
            shared: Arc::new(Shared::new(queue, config.start_paused, panic_handler)),
            workers: Mutex::new(Vec::with_capacity(config.num_threads)),
            retiring: Mutex::new(Vec::new()),
            next_worker_id: AtomicUsize::new(0),
            thread_name_prefix: config.thread_name_prefix,
        };

        // On failure the partially built pool is dropped, which joins the
        // workers spawned so far.
        for _ in 0..config.num_threads {
            pool.add_thread()?;
        }

        Ok(pool)
    }

    /// Stop handing out queued items; running items are unaffected
    pub fn pause(&self) {
        self.shared.pause();
    }

    /// Resume dequeuing and wake all workers
    pub fn resume(&self) {
        self.shared.resume();
    }

    /// Check if dequeuing is paused
    pub fn paused(&self) -> bool {
        self.shared.is_paused()
    }

    /// Number of tracked workers, including stopped ones not yet reaped
    pub fn size(&self) -> usize {
        self.workers.lock().len()
    }

    /// Number of queued items (approximate)
    ///
    /// The value may change between checking and using it.
    pub fn tasks(&self) -> usize {
        self.shared.queued()
    }

    /// Snapshot of pool counters
    pub fn stats(&self) -> PoolStats {
        let retiring = self
            .retiring
            .lock()
            .iter()
            .filter(|w| !w.is_finished())
            .count();
        PoolStats {
            retiring,
            ..self.shared.stats(self.size())
        }
    }

    /// Submit a closure and get a handle to its result
    ///
    /// A panic inside `f` is captured and returned from
    /// [`TaskHandle::wait`] as [`ThreadError::TaskPanicked`].
    pub fn submit<F, R>(&self, f: F) -> TaskHandle<R>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        self.submit_with(T::Params::default(), f)
    }

    /// Submit a closure with explicit work item parameters (e.g. a priority)
    pub fn submit_with<F, R>(&self, params: T::Params, f: F) -> TaskHandle<R>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        let (thunk, handle) = with_result_channel(f);
        self.shared.enqueue(T::with_params(thunk, params));
        handle
    }

    /// Submit `f` bound to `args`
    ///
    /// `args` is moved into the queued item now, on the caller's thread;
    /// later changes to the caller's data do not affect what runs.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_work_pool::prelude::*;
    ///
    /// # fn main() -> Result<()> {
    /// let pool = ThreadPool::with_threads(2)?;
    /// let handle = pool.submit_call(|(a, b): (i32, i32)| a * b, (6, 7));
    /// assert_eq!(handle.wait()?, 42);
    /// # Ok(())
    /// # }
    /// ```
    pub fn submit_call<F, A, R>(&self, f: F, args: A) -> TaskHandle<R>
    where
        F: FnOnce(A) -> R + Send + 'static,
        A: Send + 'static,
        R: Send + 'static,
    {
        self.submit(move || f(args))
    }

    /// Submit a closure and get an awaitable handle to its result
    #[cfg(feature = "async")]
    pub fn submit_async<F, R>(&self, f: F) -> AsyncTaskHandle<R>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        let (thunk, handle) = crate::core::handle::with_async_channel(f);
        self.shared.enqueue(T::from_fn(thunk));
        handle
    }

    /// Submit a closure without a result channel (fire-and-forget)
    ///
    /// A panic inside `f` goes to the configured panic handler.
    pub fn execute<F>(&self, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.shared.enqueue(T::from_fn(Box::new(f)));
    }

    /// Fire-and-forget with explicit work item parameters
    pub fn execute_with<F>(&self, params: T::Params, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.shared.enqueue(T::with_params(Box::new(f), params));
    }

    /// Queue a fully-formed work item as is
    pub fn emplace(&self, item: T) {
        self.shared.enqueue(item);
    }

    /// Spawn one more worker and return a handle that can stop it
    ///
    /// # Example
    ///
    /// ```
    /// use rust_work_pool::prelude::*;
    ///
    /// # fn main() -> Result<()> {
    /// let pool = ThreadPool::with_threads(2)?;
    /// let extra = pool.add_thread()?;
    /// assert_eq!(pool.size(), 3);
    ///
    /// extra.cancel();
    /// assert_eq!(pool.size(), 3);
    ///
    /// pool.cleanup();
    /// assert_eq!(pool.size(), 2);
    /// # Ok(())
    /// # }
    /// ```
    pub fn add_thread(&self) -> Result<WorkerHandle> {
        let id = self.next_worker_id.fetch_add(1, Ordering::Relaxed);
        let token = CancellationToken::new();
        let name = format!("{}-{}", self.thread_name_prefix, id);

        let worker = Worker::spawn(id, name, &self.shared, token.clone())?;
        self.workers.lock().push(worker);

        Ok(WorkerHandle::new(id, token))
    }

    /// Reap workers that were asked to stop or have exited
    ///
    /// Running workers are untouched. Reaped workers stop counting towards
    /// [`size`](Self::size) immediately, and the call never waits on a task:
    /// a stopped worker still finishing its item (or draining an unpaused
    /// queue) is parked as retiring and joined by a later `cleanup` or by
    /// drop. Safe to call from inside a task. Returns the number of workers
    /// removed from `size`.
    pub fn cleanup(&self) -> usize {
        let reaped: Vec<Worker> = {
            let mut workers = self.workers.lock();
            let (reaped, running): (Vec<Worker>, Vec<Worker>) = std::mem::take(&mut *workers)
                .into_iter()
                .partition(|w| w.token().is_cancelled() || w.is_finished());
            *workers = running;
            reaped
        };
        let count = reaped.len();

        // A worker running this very call is never finished, so it is never
        // joined here.
        let exited: Vec<Worker> = {
            let mut retiring = self.retiring.lock();
            retiring.extend(reaped);
            let (exited, busy): (Vec<Worker>, Vec<Worker>) = std::mem::take(&mut *retiring)
                .into_iter()
                .partition(|w| w.is_finished());
            *retiring = busy;
            exited
        };

        for worker in exited {
            let id = worker.id();
            match worker.join() {
                Ok(()) => log::debug!("reaped worker {}", id),
                Err(e) => log::warn!("{}", e),
            }
        }
        count
    }
}

impl<T, Q> Drop for ThreadPool<T, Q>
where
    T: WorkItem,
    Q: TaskQueue<T>,
{
    fn drop(&mut self) {
        self.shared.begin_shutdown();

        let mut workers = std::mem::take(&mut *self.workers.lock());
        for worker in &workers {
            worker
                .token()
                .cancel_with_reason(CancellationReason::PoolShutdown);
        }
        workers.append(self.retiring.get_mut());

        for worker in workers {
            if worker.is_current() {
                // Dropped from inside one of its own tasks; the thread exits
                // on its own once the task returns.
                log::warn!(
                    "pool '{}' dropped on its own worker {}; not joining it",
                    self.thread_name_prefix,
                    worker.id()
                );
                continue;
            }
            if let Err(e) = worker.join() {
                log::warn!(
                    "Failed to shutdown worker of pool '{}' during drop: {}",
                    self.thread_name_prefix,
                    e
                );
            }
        }

        let abandoned = self.shared.discard_pending();

        #[cfg(feature = "tracing")]
        crate::tracing::metrics::record_pool_shutdown(self.shared.stats(0).completed, abandoned);

        if abandoned > 0 {
            log::debug!(
                "pool '{}' discarded {} queued tasks",
                self.thread_name_prefix,
                abandoned
            );
        }
    }
}
