//! Queue abstraction for pluggable scheduling disciplines.
//!
//! The pool never touches a concrete container. It only needs the
//! [`TaskQueue`] contract, implemented once per backing container:
//!
//! - `VecDeque<T>`: FIFO, the default
//! - `BinaryHeap<T>`: max-heap priority order for `T: Ord` (see [`PriorityTask`])
//! - `Vec<T>`: LIFO
//!
//! The pool calls every method while holding its queue lock, so
//! implementations need no internal synchronization.
//!
//! # Custom Queues
//!
//! ```rust
//! use rust_work_pool::queue::TaskQueue;
//! use std::collections::VecDeque;
//!
//! /// Runs every other item from the back.
//! #[derive(Default)]
//! struct Alternating<T> {
//!     items: VecDeque<T>,
//!     flip: bool,
//! }
//!
//! impl<T: Send + 'static> TaskQueue<T> for Alternating<T> {
//!     fn is_empty(&self) -> bool {
//!         self.items.is_empty()
//!     }
//!
//!     fn push(&mut self, item: T) {
//!         self.items.push_back(item);
//!     }
//!
//!     fn pop(&mut self) -> Option<T> {
//!         self.flip = !self.flip;
//!         if self.flip {
//!             self.items.pop_front()
//!         } else {
//!             self.items.pop_back()
//!         }
//!     }
//!
//!     fn len(&self) -> usize {
//!         self.items.len()
//!     }
//! }
//! ```
//!
//! [`PriorityTask`]: crate::PriorityTask

mod fifo;
mod priority;

/// Capability contract for a work queue backing container.
pub trait TaskQueue<T>: Send + 'static {
    /// Whether the queue holds no items
    fn is_empty(&self) -> bool;

    /// Insert an item, preserving the container's ordering invariant
    fn push(&mut self, item: T);

    /// Remove and return the next item per the container's ordering
    fn pop(&mut self) -> Option<T>;

    /// Number of queued items
    fn len(&self) -> usize;
}
