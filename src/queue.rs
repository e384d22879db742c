//! A [`LinkedQueue`] is a double-ended queue of strings kept in a circular doubly-linked list.
//! The list is closed by a sentinel link that never carries a value, so the first and last
//! elements are always one hop away from it and an empty queue is just a self-linked sentinel.
//! Whole-list transforms (reverse, pairwise swap, sort, duplicate collapse) rewire the existing
//! nodes in place and never move or copy the values.

use std::alloc::Layout;
use std::fmt::Debug;
use std::marker::PhantomData;
use std::ptr::NonNull;

use crate::element::{copy_value_into, Element};
use crate::error::{QueueError, Result};
use crate::link::{Link, LinkPtr};
use crate::settings::SortOrder;

/// A double-ended queue of owned strings built on an intrusive circular list with a sentinel.
///
/// Every inserted value is copied into storage owned by the queue. `remove_*` detaches an
/// element and hands it back as a `Box<Element>`; `delete_*` releases elements directly.
/// The number of elements is not cached, so [`size`](LinkedQueue::size) walks the list.
///
/// # Examples
/// ```
/// use sentq::LinkedQueue;
/// let mut queue = LinkedQueue::new();
/// queue.insert_tail("b").unwrap();
/// queue.insert_head("a").unwrap();
/// queue.insert_tail("c").unwrap();
/// assert_eq!(queue, ["a", "b", "c"]);
/// queue.reverse();
/// assert_eq!(queue, ["c", "b", "a"]);
/// ```
pub struct LinkedQueue {
    head: LinkPtr,
    marker: PhantomData<Box<Element>>,
}

// the queue is the single owner of every node reachable from `head`
unsafe impl Send for LinkedQueue {}
unsafe impl Sync for LinkedQueue {}

impl LinkedQueue {
    /// Creates a new, empty queue, aborting if the sentinel cannot be allocated.
    ///
    /// # Examples
    /// ```
    /// # use sentq::LinkedQueue;
    /// let queue = LinkedQueue::new();
    /// assert!(queue.is_empty());
    /// assert_eq!(queue.size(), 0);
    /// ```
    pub fn new() -> Self {
        match LinkedQueue::try_new() {
            Ok(queue) => queue,
            Err(_) => std::alloc::handle_alloc_error(Layout::new::<Link>()),
        }
    }

    /// Creates a new, empty queue, reporting a failed sentinel allocation instead of aborting.
    pub fn try_new() -> Result<Self> {
        let layout = Layout::new::<Link>();
        let ptr = unsafe { std::alloc::alloc(layout) } as *mut Link;
        let Some(head) = NonNull::new(ptr) else {
            tracing::warn!(bytes = layout.size(), "sentinel allocation failed");
            return Err(QueueError::AllocFailed {
                bytes: layout.size(),
            });
        };
        unsafe {
            head.as_ptr().write(Link::dangling());
            Link::init(head);
        }
        Ok(LinkedQueue {
            head,
            marker: PhantomData,
        })
    }

    /// Returns `true` if the queue holds no elements. Unlike [`size`](Self::size) this is O(1).
    pub fn is_empty(&self) -> bool {
        unsafe { Link::is_empty(self.head) }
    }

    /// Counts the elements by walking the whole list.
    ///
    /// # Examples
    /// ```
    /// # use sentq::queue;
    /// let queue = queue!["a", "b", "c"];
    /// assert_eq!(queue.size(), 3);
    /// ```
    pub fn size(&self) -> usize {
        self.iter().count()
    }

    /// The value at the head of the queue, if any.
    pub fn head(&self) -> Option<&str> {
        self.iter().next()
    }

    /// The value at the tail of the queue, if any.
    pub fn tail(&self) -> Option<&str> {
        self.iter().next_back()
    }

    fn alloc_element(value: &str) -> Result<LinkPtr> {
        match Element::try_alloc(value) {
            Ok(ptr) => Ok(Element::link_of(ptr)),
            Err(err) => {
                tracing::warn!(error = %err, "could not allocate element");
                Err(err)
            }
        }
    }

    /// Copies `value` into a new element and links it in as the first element.
    ///
    /// On failure nothing stays allocated and the queue is unchanged.
    pub fn insert_head(&mut self, value: &str) -> Result<()> {
        let link = Self::alloc_element(value)?;
        unsafe { Link::add_after(self.head, link) };
        tracing::trace!(value, "inserted at head");
        Ok(())
    }

    /// Copies `value` into a new element and links it in as the last element.
    ///
    /// On failure nothing stays allocated and the queue is unchanged.
    pub fn insert_tail(&mut self, value: &str) -> Result<()> {
        let link = Self::alloc_element(value)?;
        unsafe { Link::add_before(self.head, link) };
        tracing::trace!(value, "inserted at tail");
        Ok(())
    }

    // used where the std traits leave no room to report failure
    fn insert_tail_or_abort(&mut self, value: &str) {
        if self.insert_tail(value).is_err() {
            std::alloc::handle_alloc_error(Layout::new::<Element>());
        }
    }

    // `link` must be a payload of this queue
    unsafe fn detach(&mut self, link: LinkPtr, buf: Option<&mut [u8]>) -> Box<Element> {
        Link::del(link);
        let element = Element::into_box(link);
        if let Some(buf) = buf {
            copy_value_into(element.value(), buf);
        }
        tracing::trace!(value = element.value(), "detached element");
        element
    }

    /// Detaches the first element and returns it, or `None` if the queue is empty.
    ///
    /// The element is not released; dropping the returned box does that. If `buf` is given,
    /// the value is also copied into it as by [`copy_value_into`].
    ///
    /// # Examples
    /// ```
    /// # use sentq::queue;
    /// let mut queue = queue!["first", "second"];
    /// let mut buf = [0u8; 4];
    /// let element = queue.remove_head(Some(&mut buf)).unwrap();
    /// assert_eq!(element.value(), "first");
    /// assert_eq!(&buf, b"fir\0");
    /// assert_eq!(queue, ["second"]);
    /// ```
    pub fn remove_head(&mut self, buf: Option<&mut [u8]>) -> Option<Box<Element>> {
        if self.is_empty() {
            return None;
        }
        Some(unsafe { self.detach(Link::next(self.head), buf) })
    }

    /// Detaches the last element and returns it, or `None` if the queue is empty.
    ///
    /// See [`remove_head`](Self::remove_head) for how `buf` is filled.
    pub fn remove_tail(&mut self, buf: Option<&mut [u8]>) -> Option<Box<Element>> {
        if self.is_empty() {
            return None;
        }
        Some(unsafe { self.detach(Link::prev(self.head), buf) })
    }

    /// Releases the element at zero-based index `⌊n / 2⌋`.
    ///
    /// The middle is found in one pass by walking inwards from both ends at once.
    ///
    /// # Examples
    /// ```
    /// # use sentq::queue;
    /// let mut queue = queue!["1", "2", "3", "4", "5", "6"];
    /// queue.delete_middle().unwrap();
    /// assert_eq!(queue, ["1", "2", "3", "5", "6"]);
    /// ```
    pub fn delete_middle(&mut self) -> Result<()> {
        if self.is_empty() {
            return Err(QueueError::Empty);
        }
        unsafe {
            let mut lead = Link::next(self.head);
            let mut trail = Link::prev(self.head);
            while lead != trail && Link::next(lead) != trail {
                lead = Link::next(lead);
                trail = Link::prev(trail);
            }
            // an even count stops with the pointers adjacent; index n/2 is the later one
            let middle = trail;
            tracing::trace!(value = Element::value_at(middle), "deleting middle element");
            Link::del(middle);
            Element::release(middle);
        }
        debug_assert!(self.is_well_formed());
        Ok(())
    }

    /// Releases every element whose value occurs more than once, keeping only the values that
    /// appear exactly once. Returns how many elements were released.
    ///
    /// The queue must already be sorted in ascending order. This is not checked: on unsorted
    /// input only runs of equal *adjacent* values are recognised, and equal values that are
    /// apart from each other all survive.
    ///
    /// # Examples
    /// ```
    /// # use sentq::queue;
    /// let mut queue = queue!["1", "1", "2", "3", "3", "3", "4"];
    /// assert_eq!(queue.delete_duplicates(), 5);
    /// assert_eq!(queue, ["2", "4"]);
    /// ```
    pub fn delete_duplicates(&mut self) -> usize {
        let mut removed = 0;
        unsafe {
            let head = self.head;
            let mut cur = Link::next(head);
            while cur != head {
                let value = Element::value_at(cur);
                let mut end = Link::next(cur);
                while end != head && Element::value_at(end) == value {
                    end = Link::next(end);
                }
                if end != Link::next(cur) {
                    while cur != end {
                        let next = Link::next(cur);
                        Link::del(cur);
                        Element::release(cur);
                        removed += 1;
                        cur = next;
                    }
                }
                cur = end;
            }
        }
        tracing::debug!(removed, "collapsed duplicate runs");
        debug_assert!(self.is_well_formed());
        removed
    }

    /// Swaps every two adjacent elements (first with second, third with fourth, ...).
    /// With an odd count the last element stays where it is.
    ///
    /// # Examples
    /// ```
    /// # use sentq::queue;
    /// let mut queue = queue!["1", "2", "3", "4", "5"];
    /// queue.swap_adjacent();
    /// assert_eq!(queue, ["2", "1", "4", "3", "5"]);
    /// ```
    pub fn swap_adjacent(&mut self) {
        unsafe {
            let head = self.head;
            let mut first = Link::next(head);
            while first != head && Link::next(first) != head {
                Link::swap_with_next(first);
                // `first` now sits second in its pair
                first = Link::next(first);
            }
        }
        debug_assert!(self.is_well_formed());
    }

    /// Reverses the order of the elements by flipping every node's links, the sentinel's included.
    pub fn reverse(&mut self) {
        if self.is_empty() {
            return;
        }
        unsafe {
            let mut node = self.head;
            loop {
                node = Link::flip(node);
                if node == self.head {
                    break;
                }
            }
        }
        debug_assert!(self.is_well_formed());
    }

    /// Stable merge sort of the values by byte order.
    ///
    /// Nodes are relinked, never copied; equal values keep their relative order in both
    /// directions. Extra space is the recursion only, O(log n) deep.
    ///
    /// # Examples
    /// ```
    /// # use sentq::{queue, SortOrder};
    /// let mut queue = queue!["3", "1", "2", "1"];
    /// queue.sort(SortOrder::Ascending);
    /// assert_eq!(queue, ["1", "1", "2", "3"]);
    /// queue.sort(SortOrder::Descending);
    /// assert_eq!(queue, ["3", "2", "1", "1"]);
    /// ```
    pub fn sort(&mut self, order: SortOrder) {
        unsafe {
            let head = self.head;
            let first = Link::next(head);
            if first == head || Link::next(first) == head {
                return;
            }
            // sorted as a chain of `next` links ending at the sentinel; `prev` is rebuilt below
            let mut cur = merge_sort(first, head, order);
            let mut prev = head;
            while cur != head {
                Link::join(prev, cur);
                prev = cur;
                cur = Link::next(cur);
            }
            Link::join(prev, head);
        }
        tracing::debug!(?order, "sorted queue");
        debug_assert!(self.is_well_formed());
    }

    /// Releases every element from head to tail, keeping the queue usable.
    pub fn clear(&mut self) {
        unsafe {
            while !Link::is_empty(self.head) {
                let link = Link::next(self.head);
                Link::del(link);
                Element::release(link);
            }
        }
    }

    /// Checks the list's link invariants by walking forward from the sentinel: every node's
    /// `next` must point back at it through `prev`, and the walk must end at the sentinel.
    ///
    /// Passing that check means walking backwards retraces the same nodes in reverse, so no
    /// second pass is needed. The walk always terminates: a loop that never returns to the
    /// sentinel has to enter through a node with two predecessors, and only one of them can
    /// match that node's `prev`, so the check fails at the other one.
    pub fn is_well_formed(&self) -> bool {
        unsafe {
            let head = self.head;
            let mut cur = head;
            loop {
                let next = Link::next(cur);
                if Link::prev(next) != cur {
                    return false;
                }
                cur = next;
                if cur == head {
                    return true;
                }
            }
        }
    }

    /// Iterates over the values from head to tail. Use `.rev()` to go from tail to head.
    pub fn iter(&self) -> Iter<'_> {
        unsafe {
            Iter {
                front: Link::next(self.head),
                back: Link::prev(self.head),
                done: self.is_empty(),
                marker: PhantomData,
            }
        }
    }
}

// `first` starts a non-empty chain of `next` links that ends at `end`
unsafe fn merge_sort(first: LinkPtr, end: LinkPtr, order: SortOrder) -> LinkPtr {
    if Link::next(first) == end {
        return first;
    }
    let mut slow = first;
    let mut fast = Link::next(first);
    while fast != end && Link::next(fast) != end {
        slow = Link::next(slow);
        fast = Link::next(Link::next(fast));
    }
    let right = Link::next(slow);
    (*slow.as_ptr()).next = end;

    let left = merge_sort(first, end, order);
    let right = merge_sort(right, end, order);
    merge(left, right, end, order)
}

unsafe fn merge(mut left: LinkPtr, mut right: LinkPtr, end: LinkPtr, order: SortOrder) -> LinkPtr {
    let mut anchor = Link::dangling();
    let anchor = NonNull::from(&mut anchor);
    let mut tail = anchor;
    while left != end && right != end {
        if order.takes_right(Element::value_at(left), Element::value_at(right)) {
            (*tail.as_ptr()).next = right;
            tail = right;
            right = Link::next(right);
        } else {
            (*tail.as_ptr()).next = left;
            tail = left;
            left = Link::next(left);
        }
    }
    (*tail.as_ptr()).next = if left != end { left } else { right };
    Link::next(anchor)
}

impl Drop for LinkedQueue {
    fn drop(&mut self) {
        self.clear();
        unsafe {
            std::alloc::dealloc(self.head.as_ptr() as *mut u8, Layout::new::<Link>());
        }
        tracing::trace!("queue destroyed");
    }
}

impl Default for LinkedQueue {
    fn default() -> Self {
        LinkedQueue::new()
    }
}

impl Debug for LinkedQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl Clone for LinkedQueue {
    fn clone(&self) -> Self {
        let mut new = LinkedQueue::new();
        new.extend(self.iter());
        new
    }
}

/// Borrowing iterator over a queue's values, created by [`LinkedQueue::iter`].
pub struct Iter<'a> {
    front: LinkPtr,
    back: LinkPtr,
    done: bool,
    marker: PhantomData<&'a Element>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let link = self.front;
        if link == self.back {
            self.done = true;
        } else {
            self.front = unsafe { Link::next(link) };
        }
        Some(unsafe { Element::value_at(link) })
    }
}

impl<'a> DoubleEndedIterator for Iter<'a> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let link = self.back;
        if link == self.front {
            self.done = true;
        } else {
            self.back = unsafe { Link::prev(link) };
        }
        Some(unsafe { Element::value_at(link) })
    }
}

impl<'a> std::iter::FusedIterator for Iter<'a> {}

/// Owning iterator that detaches elements from the head, yielding their values.
pub struct IntoIter {
    queue: LinkedQueue,
}

impl IntoIterator for LinkedQueue {
    type Item = String;
    type IntoIter = IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter { queue: self }
    }
}

impl Iterator for IntoIter {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        self.queue.remove_head(None).map(Element::into_value)
    }
}

impl DoubleEndedIterator for IntoIter {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.queue.remove_tail(None).map(Element::into_value)
    }
}

impl<'a> IntoIterator for &'a LinkedQueue {
    type Item = &'a str;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<S> FromIterator<S> for LinkedQueue
where
    S: AsRef<str>,
{
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut queue = LinkedQueue::new();
        queue.extend(iter);
        queue
    }
}

impl<S> Extend<S> for LinkedQueue
where
    S: AsRef<str>,
{
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for value in iter {
            self.insert_tail_or_abort(value.as_ref());
        }
    }
}

impl PartialEq for LinkedQueue {
    fn eq(&self, other: &LinkedQueue) -> bool {
        self.iter().eq(other.iter())
    }
}

impl Eq for LinkedQueue {}

impl<S> PartialEq<[S]> for LinkedQueue
where
    S: AsRef<str>,
{
    fn eq(&self, other: &[S]) -> bool {
        self.iter().eq(other.iter().map(AsRef::as_ref))
    }
}

impl<S, const N: usize> PartialEq<[S; N]> for LinkedQueue
where
    S: AsRef<str>,
{
    fn eq(&self, other: &[S; N]) -> bool {
        *self == other[..]
    }
}

impl<S> PartialEq<Vec<S>> for LinkedQueue
where
    S: AsRef<str>,
{
    fn eq(&self, other: &Vec<S>) -> bool {
        *self == other[..]
    }
}
