//! Result channels for submitted tasks
//!
//! A result-bearing submission pairs the queued closure with a one-slot
//! channel. The worker that runs the closure sends the outcome (its return
//! value, or the captured panic); the caller receives it through a
//! [`TaskHandle`]. If the closure is dropped unrun, the sender goes with it and
//! the handle resolves with [`ThreadError::Abandoned`].

use crate::core::error::{panic_message, Result, ThreadError};
use crate::core::job::Thunk;
use crossbeam_channel::{Receiver, RecvTimeoutError, TryRecvError};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

static NEXT_TASK_ID: AtomicU64 = AtomicU64::new(1);

/// Generates a unique task ID
fn next_task_id() -> u64 {
    NEXT_TASK_ID.fetch_add(1, Ordering::Relaxed)
}

/// Run `f`, turning a panic into [`ThreadError::TaskPanicked`]
fn run_captured<F, R>(task_id: u64, f: F) -> Result<R>
where
    F: FnOnce() -> R,
{
    catch_unwind(AssertUnwindSafe(f))
        .map_err(|payload| ThreadError::task_panicked(task_id, panic_message(&*payload)))
}

/// Handle to the eventual result of a submitted task
///
/// # Example
///
/// ```
/// use rust_work_pool::prelude::*;
///
/// # fn main() -> Result<()> {
/// let pool = ThreadPool::with_threads(2)?;
/// let handle = pool.submit(|| 6 * 7);
/// assert_eq!(handle.wait()?, 42);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct TaskHandle<R> {
    task_id: u64,
    receiver: Receiver<Result<R>>,
    taken: AtomicBool,
}

impl<R> TaskHandle<R> {
    /// Get the unique task ID
    pub fn task_id(&self) -> u64 {
        self.task_id
    }

    /// Check whether the result is available without blocking
    pub fn is_ready(&self) -> bool {
        !self.receiver.is_empty()
    }

    /// Block until the task has run and return its result
    ///
    /// # Errors
    ///
    /// - `ThreadError::TaskPanicked` - the task panicked
    /// - `ThreadError::Abandoned` - the pool was dropped before the task ran
    /// - `ThreadError::ResultTaken` - an earlier `try_wait`/`wait_timeout`
    ///   already returned the outcome
    pub fn wait(self) -> Result<R> {
        match self.receiver.recv() {
            Ok(outcome) => outcome,
            Err(_) => Err(self.disconnected()),
        }
    }

    /// Block for at most `timeout` waiting for the result
    ///
    /// A `WaitTimeout` error leaves the handle usable. The outcome is
    /// delivered once; later calls report `ThreadError::ResultTaken`.
    pub fn wait_timeout(&self, timeout: Duration) -> Result<R> {
        match self.receiver.recv_timeout(timeout) {
            Ok(outcome) => self.take(outcome),
            Err(RecvTimeoutError::Timeout) => {
                Err(ThreadError::wait_timeout(timeout.as_millis() as u64))
            }
            Err(RecvTimeoutError::Disconnected) => Err(self.disconnected()),
        }
    }

    /// Take the result if it is ready
    ///
    /// Like [`wait_timeout`](Self::wait_timeout), a spent handle reports
    /// `ThreadError::ResultTaken`.
    pub fn try_wait(&self) -> Option<Result<R>> {
        match self.receiver.try_recv() {
            Ok(outcome) => Some(self.take(outcome)),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(self.disconnected())),
        }
    }

    fn take(&self, outcome: Result<R>) -> Result<R> {
        self.taken.store(true, Ordering::Release);
        outcome
    }

    /// The sender is gone: either we already received the outcome or the
    /// task was dropped unrun.
    fn disconnected(&self) -> ThreadError {
        if self.taken.load(Ordering::Acquire) {
            ThreadError::result_taken(self.task_id)
        } else {
            ThreadError::abandoned(self.task_id)
        }
    }
}

/// Wrap `f` so that its outcome is delivered to the returned handle
pub(crate) fn with_result_channel<F, R>(f: F) -> (Thunk, TaskHandle<R>)
where
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
{
    let task_id = next_task_id();
    let (sender, receiver) = crossbeam_channel::bounded(1);

    let thunk: Thunk = Box::new(move || {
        // The handle may already be gone; the task still counts as run.
        let _ = sender.send(run_captured(task_id, f));
    });

    (
        thunk,
        TaskHandle {
            task_id,
            receiver,
            taken: AtomicBool::new(false),
        },
    )
}

#[cfg(feature = "async")]
pub use self::async_handle::AsyncTaskHandle;

#[cfg(feature = "async")]
pub(crate) use self::async_handle::with_async_channel;

#[cfg(feature = "async")]
mod async_handle {
    use super::{next_task_id, run_captured};
    use crate::core::error::{Result, ThreadError};
    use crate::core::job::Thunk;
    use futures::channel::oneshot;
    use std::future::Future;
    use std::pin::Pin;
    use std::task::{Context, Poll};

    /// Awaitable handle to the eventual result of a submitted task
    #[derive(Debug)]
    pub struct AsyncTaskHandle<R> {
        task_id: u64,
        receiver: oneshot::Receiver<Result<R>>,
    }

    impl<R> AsyncTaskHandle<R> {
        /// Get the unique task ID
        pub fn task_id(&self) -> u64 {
            self.task_id
        }
    }

    impl<R> Future for AsyncTaskHandle<R> {
        type Output = Result<R>;

        fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
            let this = self.get_mut();
            match Pin::new(&mut this.receiver).poll(cx) {
                Poll::Ready(Ok(outcome)) => Poll::Ready(outcome),
                Poll::Ready(Err(oneshot::Canceled)) => {
                    Poll::Ready(Err(ThreadError::abandoned(this.task_id)))
                }
                Poll::Pending => Poll::Pending,
            }
        }
    }

    pub(crate) fn with_async_channel<F, R>(f: F) -> (Thunk, AsyncTaskHandle<R>)
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        let task_id = next_task_id();
        let (sender, receiver) = oneshot::channel();

        let thunk: Thunk = Box::new(move || {
            let _ = sender.send(run_captured(task_id, f));
        });

        (thunk, AsyncTaskHandle { task_id, receiver })
    }
}
