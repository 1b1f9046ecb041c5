//! Work item trait and the default task type

use std::fmt;

/// A type-erased, run-once callable as accepted by [`WorkItem::with_params`]
pub type Thunk = Box<dyn FnOnce() + Send + 'static>;

/// A unit of work the pool can queue and execute
///
/// Every work item can be built from a bare [`Thunk`]; the pool relies on this
/// to wrap submitted closures. Item types that carry extra state (a priority
/// key, a tracing span) take it through [`WorkItem::Params`], which falls back
/// to its `Default` when the pool builds a plain item.
///
/// # Example
///
/// ```rust
/// use rust_work_pool::{Thunk, WorkItem};
///
/// struct Tagged {
///     job: Thunk,
///     tag: &'static str,
/// }
///
/// impl WorkItem for Tagged {
///     type Params = &'static str;
///
///     fn with_params(job: Thunk, tag: Self::Params) -> Self {
///         Self { job, tag }
///     }
///
///     fn execute(self) {
///         (self.job)()
///     }
///
///     fn kind(&self) -> &str {
///         self.tag
///     }
/// }
/// ```
pub trait WorkItem: Send + 'static {
    /// Extra construction state beyond the callable itself
    type Params: Default + Send;

    /// Build an item from a callable and explicit extra state
    fn with_params(job: Thunk, params: Self::Params) -> Self;

    /// Build an item from a callable, defaulting the extra state
    fn from_fn(job: Thunk) -> Self
    where
        Self: Sized,
    {
        Self::with_params(job, Self::Params::default())
    }

    /// Run the item. Consumes it, so an item runs at most once.
    fn execute(self);

    /// Item type name for logging
    fn kind(&self) -> &str {
        "Task"
    }
}

/// The default work item: a boxed closure with no extra state
pub struct Task {
    job: Thunk,
}

impl Task {
    /// Create a task from a closure
    pub fn new<F>(f: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self { job: Box::new(f) }
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Task")
    }
}

impl WorkItem for Task {
    type Params = ();

    fn with_params(job: Thunk, _params: ()) -> Self {
        Self { job }
    }

    fn execute(self) {
        (self.job)()
    }
}
