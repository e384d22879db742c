//! A [`LinkedQueue`] is a double-ended queue of strings kept in an intrusive circular
//! doubly-linked list anchored by a sentinel node.
//!
//! Besides insertion and removal at both ends it offers whole-list transforms that only
//! rewire links: [`reverse`](LinkedQueue::reverse), pairwise
//! [`swap_adjacent`](LinkedQueue::swap_adjacent), a stable merge [`sort`](LinkedQueue::sort),
//! [`delete_middle`](LinkedQueue::delete_middle) and
//! [`delete_duplicates`](LinkedQueue::delete_duplicates) for sorted queues. None of them use
//! extra storage proportional to the queue's length.
//!
//! The [`ops`] module exposes the same operations as free functions over optional queue handles,
//! the shape a command-driven test harness expects.
//!
//! ```
//! use sentq::{queue, SortOrder};
//! let mut queue = queue!["3", "1", "2", "1"];
//! queue.sort(SortOrder::Ascending);
//! assert_eq!(queue, ["1", "1", "2", "3"]);
//! queue.delete_duplicates();
//! assert_eq!(queue, ["2", "3"]);
//! ```

mod element;
mod error;
mod link;
pub mod ops;
mod queue;
mod settings;

pub use element::{copy_value_into, Element};
pub use error::{QueueError, Result};
pub use queue::{IntoIter, Iter, LinkedQueue};
pub use settings::SortOrder;

// vec macro but for LinkedQueue
#[macro_export]
macro_rules! queue {
    () => {
        $crate::LinkedQueue::new()
    };
    ($($x:expr),+ $(,)?) => {
        <$crate::LinkedQueue as ::core::iter::FromIterator<_>>::from_iter([$($x),+])
    };
}
