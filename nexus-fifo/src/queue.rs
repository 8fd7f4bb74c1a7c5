//! The capability set shared by every queue in this crate.
//!
//! [`FifoQueue`] covers mutation and counting. Traversal that must survive
//! the caller holding the queue mutably in between steps goes through a
//! [`QueueCursor`]: a detached position plus an
//! [`Observation`](crate::Observation) of the queue it was created from. The cursor keeps no reference to the queue; each step
//! is handed the queue and re-validates it.
//!
//! ```
//! use nexus_fifo::{ArrayQueue, QueueCursor, QueueError};
//!
//! let mut queue: ArrayQueue<u32> = [1, 2, 3].into_iter().collect();
//! let mut cursor = queue.cursor();
//!
//! assert!(cursor.advance(&queue).unwrap());
//! assert_eq!(cursor.current(&queue), Ok(&1));
//!
//! queue.enqueue(4);
//! assert!(matches!(cursor.advance(&queue), Err(QueueError::StaleCursor { .. })));
//! ```

use crate::{QueueError, QueueId, Version};

/// First-in-first-out queue with versioned traversal.
pub trait FifoQueue<T> {
    /// Cursor type produced by [`cursor`](Self::cursor).
    type Cursor: QueueCursor<T, Self>;

    /// Appends an item at the back. Always succeeds.
    fn enqueue(&mut self, item: T);

    /// Removes and returns the oldest item.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::Empty`] if the queue holds no items. The queue is
    /// not modified in that case.
    fn dequeue(&mut self) -> Result<T, QueueError>;

    /// Returns the oldest item without removing it.
    fn front(&self) -> Option<&T>;

    /// Returns the number of items.
    fn len(&self) -> usize;

    /// Returns `true` if the queue holds no items.
    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the current mutation counter.
    fn version(&self) -> Version;

    /// Returns this queue's identity.
    fn id(&self) -> QueueId;

    /// Creates a cursor positioned before the oldest item.
    fn cursor(&self) -> Self::Cursor;

    /// Builds a queue by enqueuing every item of `source` in order.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::MissingSource`] if `source` is `None`.
    fn from_source<I>(source: Option<I>) -> Result<Self, QueueError>
    where
        Self: Default + Sized,
        I: IntoIterator<Item = T>,
    {
        let source = source.ok_or(QueueError::MissingSource)?;
        let mut queue = Self::default();
        for item in source {
            queue.enqueue(item);
        }
        Ok(queue)
    }
}

/// Where a cursor currently sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position<P> {
    /// Before the first advance.
    NotStarted,
    /// On an element.
    At(P),
    /// Past the last element. Terminal until [`reset`](QueueCursor::reset).
    Exhausted,
}

/// Fail-fast forward cursor over a [`FifoQueue`].
///
/// Every operation first checks that `queue` is the queue the cursor was
/// created from and that it has not been mutated since. Any mutation, even
/// one that leaves the contents looking the same, invalidates the cursor for
/// good: [`reset`](Self::reset) does not refresh the observed version.
pub trait QueueCursor<T, Q: ?Sized> {
    /// Moves to the next element.
    ///
    /// Returns `Ok(false)` once the end is reached, and on every call after.
    ///
    /// # Errors
    ///
    /// [`QueueError::StaleCursor`] if `queue` changed since the cursor was
    /// created, [`QueueError::ForeignQueue`] if it is a different queue.
    fn advance(&mut self, queue: &Q) -> Result<bool, QueueError>;

    /// Returns the element under the cursor.
    ///
    /// # Errors
    ///
    /// [`QueueError::CursorOutOfRange`] before the first advance or after
    /// exhaustion, otherwise the same validation errors as
    /// [`advance`](Self::advance).
    fn current<'q>(&self, queue: &'q Q) -> Result<&'q T, QueueError>;

    /// Returns to the position before the first element.
    ///
    /// # Errors
    ///
    /// Same validation errors as [`advance`](Self::advance).
    fn reset(&mut self, queue: &Q) -> Result<(), QueueError>;
}
