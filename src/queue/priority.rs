//! Priority queue over `BinaryHeap`.
//!
//! Items pop largest first according to their `Ord`. Equal items come out in
//! whatever order the heap produces.

use super::TaskQueue;
use std::collections::BinaryHeap;

impl<T: Ord + Send + 'static> TaskQueue<T> for BinaryHeap<T> {
    fn is_empty(&self) -> bool {
        BinaryHeap::is_empty(self)
    }

    fn push(&mut self, item: T) {
        BinaryHeap::push(self, item);
    }

    fn pop(&mut self) -> Option<T> {
        BinaryHeap::pop(self)
    }

    fn len(&self) -> usize {
        BinaryHeap::len(self)
    }
}
