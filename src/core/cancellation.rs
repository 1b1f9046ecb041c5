//! Worker cancellation infrastructure
//!
//! Each worker thread owns a [`CancellationToken`]. The caller that added the
//! worker holds a [`WorkerHandle`] sharing the same token, and cancelling it
//! asks that one worker to exit. Cancellation is cooperative: the worker only
//! observes it while waiting for work, never in the middle of a task.
//!
//! # Example
//!
//! ```rust
//! use rust_work_pool::CancellationToken;
//! use std::sync::atomic::{AtomicBool, Ordering};
//! use std::sync::Arc;
//!
//! let token = CancellationToken::new();
//! let woken = Arc::new(AtomicBool::new(false));
//! let woken_clone = Arc::clone(&woken);
//!
//! token.on_cancel(move || woken_clone.store(true, Ordering::SeqCst));
//! token.cancel();
//!
//! assert!(token.is_cancelled());
//! assert!(woken.load(Ordering::SeqCst));
//! ```

use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Reason for cancellation
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CancellationReason {
    /// Explicitly cancelled through a handle
    Manual,
    /// Cancelled because the owning pool is being dropped
    PoolShutdown,
}

impl std::fmt::Display for CancellationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CancellationReason::Manual => write!(f, "manually cancelled"),
            CancellationReason::PoolShutdown => write!(f, "pool shut down"),
        }
    }
}

type Callback = Box<dyn FnOnce() + Send>;

struct CancellationTokenInner {
    cancelled: AtomicBool,
    callbacks: Mutex<Vec<Callback>>,
    reason: RwLock<Option<CancellationReason>>,
}

/// A thread-safe cancellation flag shared between a worker and its handle
#[derive(Clone)]
pub struct CancellationToken {
    inner: Arc<CancellationTokenInner>,
}

impl std::fmt::Debug for CancellationToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancellationToken")
            .field("cancelled", &self.is_cancelled())
            .field("reason", &self.reason())
            .finish()
    }
}

impl CancellationToken {
    /// Create a new cancellation token (not cancelled)
    pub fn new() -> Self {
        Self {
            inner: Arc::new(CancellationTokenInner {
                cancelled: AtomicBool::new(false),
                callbacks: Mutex::new(Vec::new()),
                reason: RwLock::new(None),
            }),
        }
    }

    /// Cancel this token with default reason (Manual)
    ///
    /// Idempotent: only the first call records a reason and runs callbacks.
    pub fn cancel(&self) {
        self.cancel_with_reason(CancellationReason::Manual);
    }

    /// Cancel this token with a specific reason
    pub fn cancel_with_reason(&self, reason: CancellationReason) {
        if self.inner.cancelled.swap(true, Ordering::SeqCst) {
            return;
        }

        *self.inner.reason.write() = Some(reason);

        // Registration checks the flag under this lock, so nothing can slip
        // in after the drain.
        let callbacks: Vec<_> = self.inner.callbacks.lock().drain(..).collect();
        for callback in callbacks {
            callback();
        }
    }

    /// Check if this token has been cancelled
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::Acquire)
    }

    /// Returns the cancellation reason (if cancelled)
    pub fn reason(&self) -> Option<CancellationReason> {
        self.inner.reason.read().clone()
    }

    /// Registers a callback to run once when the token is cancelled
    ///
    /// Runs immediately if the token is already cancelled.
    pub fn on_cancel<F>(&self, callback: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let mut callbacks = self.inner.callbacks.lock();
        if self.is_cancelled() {
            drop(callbacks);
            callback();
        } else {
            callbacks.push(Box::new(callback));
        }
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Caller-side handle for one worker thread added with
/// [`ThreadPool::add_thread`](crate::ThreadPool::add_thread)
///
/// Cancelling the handle asks the worker to exit once it is idle. The worker
/// keeps counting towards [`ThreadPool::size`](crate::ThreadPool::size) until
/// [`ThreadPool::cleanup`](crate::ThreadPool::cleanup) reaps it.
#[derive(Debug, Clone)]
pub struct WorkerHandle {
    worker_id: usize,
    token: CancellationToken,
}

impl WorkerHandle {
    pub(crate) fn new(worker_id: usize, token: CancellationToken) -> Self {
        Self { worker_id, token }
    }

    /// Get the worker's ID
    pub fn worker_id(&self) -> usize {
        self.worker_id
    }

    /// Get a reference to the worker's cancellation token
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Ask the worker to stop
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Check if a stop was requested for this worker
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}
