//! Allocation failures are reported without leaking and without touching the queue.
//!
//! The global allocator below counts live allocations per thread and can be told to fail
//! the n-th allocation made on the current thread, once.

use std::alloc::{GlobalAlloc, Layout, System};
use std::cell::Cell;

use sentq::{ops, LinkedQueue, QueueError};

struct FailingAlloc;

thread_local! {
    static FAIL_NTH: Cell<Option<usize>> = const { Cell::new(None) };
    static LIVE: Cell<isize> = const { Cell::new(0) };
}

unsafe impl GlobalAlloc for FailingAlloc {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let fail = FAIL_NTH
            .try_with(|nth| match nth.get() {
                Some(0) => {
                    nth.set(None);
                    true
                }
                Some(n) => {
                    nth.set(Some(n - 1));
                    false
                }
                None => false,
            })
            .unwrap_or(false);
        if fail {
            return std::ptr::null_mut();
        }
        let ptr = System.alloc(layout);
        if !ptr.is_null() {
            let _ = LIVE.try_with(|live| live.set(live.get() + 1));
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        let _ = LIVE.try_with(|live| live.set(live.get() - 1));
        System.dealloc(ptr, layout);
    }
}

#[global_allocator]
static GLOBAL: FailingAlloc = FailingAlloc;

fn live() -> isize {
    LIVE.with(Cell::get)
}

// runs `f` with the n-th allocation it makes (zero-based) failing
fn failing_nth<R>(n: usize, f: impl FnOnce() -> R) -> R {
    FAIL_NTH.with(|nth| nth.set(Some(n)));
    let out = f();
    FAIL_NTH.with(|nth| nth.set(None));
    out
}

fn filled() -> LinkedQueue {
    let mut queue = LinkedQueue::new();
    queue.insert_tail("a").unwrap();
    queue.insert_tail("b").unwrap();
    // warm up anything that allocates once on the failure path
    let _ = failing_nth(0, || queue.insert_tail("warmup"));
    let _ = failing_nth(1, || queue.insert_tail("warmup"));
    queue
}

#[test]
fn value_allocation_failure_leaves_queue_unchanged() {
    let mut queue = filled();
    let before = live();
    let result = failing_nth(0, || queue.insert_head("value"));
    assert_eq!(result, Err(QueueError::AllocFailed { bytes: 5 }));
    assert_eq!(live(), before);
    assert_eq!(queue, ["a", "b"]);
    assert!(queue.is_well_formed());
}

#[test]
fn node_allocation_failure_releases_the_value_copy() {
    let mut queue = filled();
    let before = live();
    // the value copy succeeds, the node allocation after it fails
    let result = failing_nth(1, || queue.insert_tail("value"));
    assert!(matches!(result, Err(QueueError::AllocFailed { .. })));
    assert_eq!(live(), before);
    assert_eq!(queue, ["a", "b"]);
    assert!(queue.is_well_formed());
}

#[test]
fn driver_insert_reports_false_on_failure() {
    let mut queue = Some(filled());
    let before = live();
    assert!(!failing_nth(1, || ops::insert_head(queue.as_mut(), "value")));
    assert_eq!(live(), before);
    assert_eq!(ops::size(queue.as_ref()), 2);
    assert!(ops::insert_head(queue.as_mut(), "value"));
    assert_eq!(ops::size(queue.as_ref()), 3);
}

#[test]
fn sentinel_allocation_failure() {
    assert_eq!(
        failing_nth(0, LinkedQueue::try_new).err(),
        Some(QueueError::AllocFailed {
            bytes: 2 * std::mem::size_of::<usize>()
        })
    );
    assert!(failing_nth(0, ops::create).is_none());
    assert!(ops::create().is_some());
}

#[test]
fn clear_and_drop_release_every_element() {
    let before = live();
    let mut queue = LinkedQueue::new();
    for value in ["a", "b", "c"] {
        queue.insert_tail(value).unwrap();
    }
    let sentinel_only = {
        let mut empty = LinkedQueue::new();
        let with_empty = live();
        empty.clear();
        drop(empty);
        with_empty - live()
    };
    queue.clear();
    assert!(queue.is_empty());
    assert_eq!(live() - before, sentinel_only);
    drop(queue);
    assert_eq!(live(), before);
}
