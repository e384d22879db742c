//! Error types for queue operations

use thiserror::Error;

/// Result type for queue operations
pub type Result<T> = std::result::Result<T, QueueError>;

/// Errors that can occur when operating on a [`LinkedQueue`](crate::LinkedQueue).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueError {
    /// Storage for a node, its value, or the sentinel could not be obtained.
    #[error("allocation of {bytes} bytes failed")]
    AllocFailed { bytes: usize },

    #[error("queue is empty")]
    Empty,
}
