//! The intrusive link shared by the sentinel and every payload element.
//!
//! All functions here operate on raw [`NonNull`] pointers and are `unsafe`: the caller
//! guarantees every pointer handed in refers to a live `Link` that belongs to a well-formed
//! circular list (or, for [`Link::init`], to storage that is about to become one).

use std::ptr::NonNull;

pub(crate) type LinkPtr = NonNull<Link>;

#[repr(C)]
pub(crate) struct Link {
    pub(crate) prev: LinkPtr,
    pub(crate) next: LinkPtr,
}

impl Link {
    /// An unlinked link. Must be passed through [`Link::init`] or [`Link::add`] before use.
    pub(crate) fn dangling() -> Self {
        Link {
            prev: NonNull::dangling(),
            next: NonNull::dangling(),
        }
    }

    /// Points both neighbors of `node` at itself, making it an empty circle.
    pub(crate) unsafe fn init(node: LinkPtr) {
        (*node.as_ptr()).prev = node;
        (*node.as_ptr()).next = node;
    }

    #[inline]
    pub(crate) unsafe fn next(node: LinkPtr) -> LinkPtr {
        (*node.as_ptr()).next
    }

    #[inline]
    pub(crate) unsafe fn prev(node: LinkPtr) -> LinkPtr {
        (*node.as_ptr()).prev
    }

    #[inline]
    pub(crate) unsafe fn is_empty(head: LinkPtr) -> bool {
        Link::next(head) == head
    }

    /// Makes `second` follow `first`.
    #[inline]
    pub(crate) unsafe fn join(first: LinkPtr, second: LinkPtr) {
        (*first.as_ptr()).next = second;
        (*second.as_ptr()).prev = first;
    }

    /// Links `node` in between two adjacent nodes.
    pub(crate) unsafe fn add(node: LinkPtr, prev: LinkPtr, next: LinkPtr) {
        debug_assert!(Link::next(prev) == next);
        Link::join(prev, node);
        Link::join(node, next);
    }

    pub(crate) unsafe fn add_after(anchor: LinkPtr, node: LinkPtr) {
        Link::add(node, anchor, Link::next(anchor));
    }

    pub(crate) unsafe fn add_before(anchor: LinkPtr, node: LinkPtr) {
        Link::add(node, Link::prev(anchor), anchor);
    }

    /// Unlinks `node`, joining its neighbors, and leaves it self-linked.
    pub(crate) unsafe fn del(node: LinkPtr) {
        Link::join(Link::prev(node), Link::next(node));
        Link::init(node);
    }

    /// Exchanges the positions of `first` and the node right after it.
    /// Neither `first` nor its successor may be the sentinel.
    pub(crate) unsafe fn swap_with_next(first: LinkPtr) {
        let second = Link::next(first);
        let before = Link::prev(first);
        let after = Link::next(second);

        (*before.as_ptr()).next = second;
        (*after.as_ptr()).prev = first;
        (*first.as_ptr()).next = after;
        (*second.as_ptr()).prev = before;
        (*first.as_ptr()).prev = second;
        (*second.as_ptr()).next = first;
    }

    /// Exchanges the `prev` and `next` roles of `node`, returning what used to be its `next`.
    pub(crate) unsafe fn flip(node: LinkPtr) -> LinkPtr {
        let link = &mut *node.as_ptr();
        std::mem::swap(&mut link.prev, &mut link.next);
        link.prev
    }
}
