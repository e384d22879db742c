use std::alloc::Layout;
use std::fmt::Debug;
use std::ptr::NonNull;

use crate::error::{QueueError, Result};
use crate::link::{Link, LinkPtr};

/// A payload element: an intrusive [`Link`] followed by an owned copy of the value.
///
/// Elements only exist inside a [`LinkedQueue`](crate::LinkedQueue) or as a detached
/// `Box<Element>` handed out by one of its `remove_*` methods. Dropping the box
/// releases both the node and its value.
///
/// # Examples
/// ```
/// use sentq::LinkedQueue;
/// let mut queue = LinkedQueue::new();
/// queue.insert_tail("kept").unwrap();
/// let element = queue.remove_head(None).unwrap();
/// assert_eq!(element.value(), "kept");
/// assert_eq!(element.into_value(), String::from("kept"));
/// ```
// `link` must stay the first field so a `LinkPtr` can be cast back to its element
#[repr(C)]
pub struct Element {
    link: Link,
    value: String,
}

// a detached element's link only ever points at itself
unsafe impl Send for Element {}
unsafe impl Sync for Element {}

impl Element {
    /// Returns the stored value.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Consumes the element, returning its value without copying it.
    pub fn into_value(self: Box<Self>) -> String {
        self.value
    }

    /// Allocates a self-linked element holding a fresh copy of `value`.
    ///
    /// The copy is made first, so a failed node allocation drops it again
    /// and nothing is left allocated.
    pub(crate) fn try_alloc(value: &str) -> Result<NonNull<Element>> {
        let mut owned = String::new();
        owned
            .try_reserve_exact(value.len())
            .map_err(|_| QueueError::AllocFailed { bytes: value.len() })?;
        owned.push_str(value);

        let layout = Layout::new::<Element>();
        let ptr = unsafe { std::alloc::alloc(layout) } as *mut Element;
        let ptr = NonNull::new(ptr).ok_or(QueueError::AllocFailed {
            bytes: layout.size(),
        })?;
        unsafe {
            ptr.as_ptr().write(Element {
                link: Link::dangling(),
                value: owned,
            });
            Link::init(Element::link_of(ptr));
        }
        Ok(ptr)
    }

    #[inline]
    pub(crate) fn link_of(ptr: NonNull<Element>) -> LinkPtr {
        unsafe { NonNull::new_unchecked(std::ptr::addr_of_mut!((*ptr.as_ptr()).link)) }
    }

    /// Recovers the element that embeds `link`.
    /// `link` must not be the sentinel.
    #[inline]
    pub(crate) unsafe fn from_link(link: LinkPtr) -> NonNull<Element> {
        link.cast()
    }

    /// Borrows the value of the element that embeds `link`.
    #[inline]
    pub(crate) unsafe fn value_at<'a>(link: LinkPtr) -> &'a str {
        &(*Element::from_link(link).as_ptr()).value
    }

    /// Takes ownership of an element that is no longer linked into any queue.
    #[inline]
    pub(crate) unsafe fn into_box(link: LinkPtr) -> Box<Element> {
        // allocated with the global allocator and `Layout::new::<Element>()`
        Box::from_raw(Element::from_link(link).as_ptr())
    }

    /// Releases an element that is no longer linked into any queue.
    #[inline]
    pub(crate) unsafe fn release(link: LinkPtr) {
        drop(Element::into_box(link));
    }
}

impl Debug for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Element").field(&self.value).finish()
    }
}

/// Copies `value` into a caller-supplied buffer, C string style.
///
/// At most `buf.len() - 1` bytes are copied and the rest of the buffer is zeroed,
/// so the result is always terminated. Longer values are truncated silently;
/// an empty buffer is left untouched.
///
/// # Examples
/// ```
/// let mut buf = [0xffu8; 4];
/// sentq::copy_value_into("hello", &mut buf);
/// assert_eq!(&buf, b"hel\0");
/// ```
pub fn copy_value_into(value: &str, buf: &mut [u8]) {
    let Some(room) = buf.len().checked_sub(1) else {
        return;
    };
    let n = value.len().min(room);
    buf[..n].copy_from_slice(&value.as_bytes()[..n]);
    buf[n..].fill(0);
}
