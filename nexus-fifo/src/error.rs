// nexus-fifo/src/error.rs

//! Error types for queue and cursor operations.

use crate::Version;

/// Broad class of a [`QueueError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The caller supplied an unusable argument.
    InvalidArgument,
    /// The operation is not valid in the current state.
    InvalidOperation,
}

/// Failure reported by a queue or one of its cursors.
///
/// Every failure is local to the call that raised it. Nothing is retried and
/// the queue is left unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum QueueError {
    /// Construction was given no source sequence.
    #[error("cannot build a queue from an absent source")]
    MissingSource,

    /// Dequeue on an empty queue.
    #[error("queue is empty")]
    Empty,

    /// The queue was mutated after the cursor observed it.
    #[error("queue modified during traversal (observed version {observed}, now {current})")]
    StaleCursor {
        /// Version recorded when the cursor was created.
        observed: Version,
        /// Version of the queue at the failing call.
        current: Version,
    },

    /// The cursor is not positioned on an element.
    #[error("cursor is not positioned on an element")]
    CursorOutOfRange,

    /// The cursor was driven against a queue other than the one it came from.
    #[error("cursor belongs to a different queue")]
    ForeignQueue,
}

impl QueueError {
    /// Returns the class of this error.
    #[inline]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingSource => ErrorKind::InvalidArgument,
            Self::Empty | Self::StaleCursor { .. } | Self::CursorOutOfRange | Self::ForeignQueue => {
                ErrorKind::InvalidOperation
            }
        }
    }

    /// Returns `true` if this error reports a stale cursor.
    #[inline]
    pub const fn is_stale(&self) -> bool {
        matches!(self, Self::StaleCursor { .. })
    }
}
