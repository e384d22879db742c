//! The flat operation surface a test driver calls into.
//!
//! Each function takes the queue as an optional handle and reports through plain return
//! values: a missing queue is never a fault, it just makes the operation a no-op that
//! returns `false`, `None` or `0`. The methods on [`LinkedQueue`] are the richer interface;
//! these functions only adapt them.
//!
//! # Examples
//! ```
//! use sentq::ops;
//! let mut queue = ops::create();
//! assert!(ops::insert_tail(queue.as_mut(), "b"));
//! assert!(ops::insert_head(queue.as_mut(), "a"));
//! assert_eq!(ops::size(queue.as_ref()), 2);
//!
//! let mut buf = [0u8; 8];
//! let element = ops::remove_head(queue.as_mut(), Some(&mut buf)).unwrap();
//! assert_eq!(&buf[..2], b"a\0");
//! ops::release_node(element);
//!
//! assert!(!ops::insert_tail(None, "ignored"));
//! ops::destroy(queue);
//! ```

use crate::element::Element;
use crate::queue::LinkedQueue;
use crate::settings::SortOrder;

/// Allocates a new, empty queue, or `None` if the sentinel could not be allocated.
pub fn create() -> Option<LinkedQueue> {
    LinkedQueue::try_new().ok()
}

/// Releases the queue and every element still in it.
pub fn destroy(queue: Option<LinkedQueue>) {
    drop(queue);
}

/// Releases an element previously detached by [`remove_head`] or [`remove_tail`].
pub fn release_node(element: Box<Element>) {
    drop(element);
}

pub fn insert_head(queue: Option<&mut LinkedQueue>, value: &str) -> bool {
    queue.map_or(false, |queue| queue.insert_head(value).is_ok())
}

pub fn insert_tail(queue: Option<&mut LinkedQueue>, value: &str) -> bool {
    queue.map_or(false, |queue| queue.insert_tail(value).is_ok())
}

/// Detaches the first element. With `buf`, its value is copied out as by
/// [`copy_value_into`](crate::copy_value_into).
pub fn remove_head(
    queue: Option<&mut LinkedQueue>,
    buf: Option<&mut [u8]>,
) -> Option<Box<Element>> {
    queue?.remove_head(buf)
}

/// Detaches the last element. With `buf`, its value is copied out as by
/// [`copy_value_into`](crate::copy_value_into).
pub fn remove_tail(
    queue: Option<&mut LinkedQueue>,
    buf: Option<&mut [u8]>,
) -> Option<Box<Element>> {
    queue?.remove_tail(buf)
}

pub fn size(queue: Option<&LinkedQueue>) -> usize {
    queue.map_or(0, LinkedQueue::size)
}

/// Releases the element at index `⌊n / 2⌋`. `false` for a missing or empty queue.
pub fn delete_middle(queue: Option<&mut LinkedQueue>) -> bool {
    queue.map_or(false, |queue| queue.delete_middle().is_ok())
}

/// Releases every element whose value is duplicated. The queue must be sorted ascending.
/// `false` only for a missing queue.
pub fn delete_duplicates(queue: Option<&mut LinkedQueue>) -> bool {
    match queue {
        Some(queue) => {
            queue.delete_duplicates();
            true
        }
        None => false,
    }
}

pub fn swap_adjacent(queue: Option<&mut LinkedQueue>) {
    if let Some(queue) = queue {
        queue.swap_adjacent();
    }
}

pub fn reverse(queue: Option<&mut LinkedQueue>) {
    if let Some(queue) = queue {
        queue.reverse();
    }
}

pub fn sort(queue: Option<&mut LinkedQueue>, descending: bool) {
    if let Some(queue) = queue {
        queue.sort(SortOrder::from(descending));
    }
}

#[cfg(test)]
mod ops_tests {
    use super::*;

    fn filled(values: &[&str]) -> Option<LinkedQueue> {
        let mut queue = create();
        for value in values {
            assert!(insert_tail(queue.as_mut(), value));
        }
        queue
    }

    fn contents(queue: &Option<LinkedQueue>) -> Vec<String> {
        queue
            .as_ref()
            .map(|queue| queue.iter().map(String::from).collect())
            .unwrap_or_default()
    }

    #[test]
    fn absent_queue_is_never_a_fault() {
        let mut buf = [1u8; 4];
        assert!(!insert_head(None, "a"));
        assert!(!insert_tail(None, "a"));
        assert!(remove_head(None, Some(&mut buf)).is_none());
        assert!(remove_tail(None, None).is_none());
        assert_eq!(buf, [1, 1, 1, 1]);
        assert_eq!(size(None), 0);
        assert!(!delete_middle(None));
        assert!(!delete_duplicates(None));
        swap_adjacent(None);
        reverse(None);
        sort(None, true);
        destroy(None);
    }

    #[test]
    fn empty_queue_results() {
        let mut queue = create();
        assert_eq!(size(queue.as_ref()), 0);
        assert!(remove_head(queue.as_mut(), None).is_none());
        assert!(remove_tail(queue.as_mut(), None).is_none());
        assert!(!delete_middle(queue.as_mut()));
        assert!(delete_duplicates(queue.as_mut()));
        reverse(queue.as_mut());
        sort(queue.as_mut(), false);
        assert_eq!(size(queue.as_ref()), 0);
        destroy(queue);
    }

    #[test]
    fn remove_copies_and_detaches() {
        let mut queue = filled(&["alpha", "beta"]);
        let mut buf = [0xffu8; 3];
        let element = remove_tail(queue.as_mut(), Some(&mut buf)).unwrap();
        assert_eq!(&buf, b"be\0");
        assert_eq!(element.value(), "beta");
        assert_eq!(contents(&queue), vec!["alpha"]);
        release_node(element);
        destroy(queue);
    }

    #[test]
    fn whole_list_operations() {
        let mut queue = filled(&["1", "2", "3", "4", "5", "6"]);
        assert!(delete_middle(queue.as_mut()));
        assert_eq!(contents(&queue), vec!["1", "2", "3", "5", "6"]);

        swap_adjacent(queue.as_mut());
        assert_eq!(contents(&queue), vec!["2", "1", "5", "3", "6"]);

        sort(queue.as_mut(), true);
        assert_eq!(contents(&queue), vec!["6", "5", "3", "2", "1"]);

        reverse(queue.as_mut());
        assert_eq!(contents(&queue), vec!["1", "2", "3", "5", "6"]);

        assert!(insert_tail(queue.as_mut(), "6"));
        assert!(insert_head(queue.as_mut(), "1"));
        assert!(delete_duplicates(queue.as_mut()));
        assert_eq!(contents(&queue), vec!["2", "3", "5"]);
        assert_eq!(size(queue.as_ref()), 3);
    }
}
