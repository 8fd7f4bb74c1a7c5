//! Growable circular-buffer queue.
//!
//! Items live in a boxed slice of `Option<T>` slots addressed circularly:
//! the oldest item sits at `head`, the next free slot is `tail`, and both wrap
//! modulo the capacity. When the buffer is full the next enqueue moves the
//! live region into a larger buffer, unwrapping it so that `head` returns to
//! zero.
//!
//! ```text
//! capacity 8, len 5, wrapped:
//!
//!   [ d | e | _ | _ | _ | a | b | c ]
//!             ^tail       ^head
//!
//! after growth to 16:
//!
//!   [ a | b | c | d | e | _ | ... | _ ]
//!     ^head           ^tail
//! ```
//!
//! # Example
//!
//! ```
//! use nexus_fifo::{ArrayQueue, GrowthPolicy};
//!
//! let mut queue = ArrayQueue::with_policy(GrowthPolicy::Doubling);
//! queue.enqueue("a");
//! queue.enqueue("b");
//!
//! assert_eq!(queue.get(1), Some(&"b"));
//! assert_eq!(queue.dequeue(), Ok("a"));
//! assert_eq!(queue.len(), 1);
//! ```

use core::fmt;
use core::iter::FusedIterator;

use tracing::trace;

use crate::queue::Position;
use crate::{FifoQueue, GrowthPolicy, Observation, QueueCursor, QueueError, QueueId, Version};

/// A FIFO queue backed by a growable ring buffer.
///
/// Enqueue and dequeue are amortized O(1) under [`GrowthPolicy::Doubling`].
/// Positional reads via [`get`](Self::get) are O(1).
pub struct ArrayQueue<T> {
    slots: Box<[Option<T>]>,
    head: usize,
    tail: usize,
    len: usize,
    version: Version,
    id: QueueId,
    policy: GrowthPolicy,
}

impl<T> ArrayQueue<T> {
    /// Creates an empty queue with no allocated slots.
    #[inline]
    pub fn new() -> Self {
        Self::with_capacity_and_policy(0, GrowthPolicy::default())
    }

    /// Creates an empty queue with room for `capacity` items.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_policy(capacity, GrowthPolicy::default())
    }

    /// Creates an empty queue that grows according to `policy`.
    #[inline]
    pub fn with_policy(policy: GrowthPolicy) -> Self {
        Self::with_capacity_and_policy(0, policy)
    }

    /// Creates an empty queue with room for `capacity` items that grows
    /// according to `policy`.
    pub fn with_capacity_and_policy(capacity: usize, policy: GrowthPolicy) -> Self {
        Self {
            slots: empty_slots(capacity),
            head: 0,
            tail: 0,
            len: 0,
            version: Version::default(),
            id: QueueId::next(),
            policy,
        }
    }

    /// Returns the number of items.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the queue holds no items.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of allocated slots.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the growth policy.
    #[inline]
    pub fn policy(&self) -> GrowthPolicy {
        self.policy
    }

    /// Returns the current mutation counter.
    #[inline]
    pub fn version(&self) -> Version {
        self.version
    }

    /// Returns this queue's identity.
    #[inline]
    pub fn id(&self) -> QueueId {
        self.id
    }

    /// Appends an item at the back, growing the buffer first if it is full.
    ///
    /// Bumps the version once, including when the call grows the buffer.
    pub fn enqueue(&mut self, item: T) {
        if self.len == self.slots.len() {
            let capacity = self.policy.next_capacity(self.slots.len());
            self.set_capacity(capacity);
        }

        self.slots[self.tail] = Some(item);
        self.tail = (self.tail + 1) % self.slots.len();
        self.len += 1;
        self.version.bump();
    }

    /// Removes and returns the oldest item.
    ///
    /// The vacated slot is cleared so the buffer holds no stale value.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::Empty`] if the queue holds no items.
    pub fn dequeue(&mut self) -> Result<T, QueueError> {
        // The head slot is occupied iff the queue is non-empty.
        let Some(item) = self.slots.get_mut(self.head).and_then(Option::take) else {
            return Err(QueueError::Empty);
        };

        self.head = (self.head + 1) % self.slots.len();
        self.len -= 1;
        self.version.bump();
        Ok(item)
    }

    /// Returns the item at logical position `index`, where 0 is the oldest.
    ///
    /// Returns `None` if `index >= len`.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&T> {
        if index >= self.len {
            return None;
        }
        self.slots[(self.head + index) % self.slots.len()].as_ref()
    }

    /// Returns a mutable reference to the item at logical position `index`.
    ///
    /// Does not count as a structural mutation.
    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        if index >= self.len {
            return None;
        }
        let slot = (self.head + index) % self.slots.len();
        self.slots[slot].as_mut()
    }

    /// Returns the oldest item.
    #[inline]
    pub fn front(&self) -> Option<&T> {
        self.get(0)
    }

    /// Returns the newest item.
    #[inline]
    pub fn back(&self) -> Option<&T> {
        self.len.checked_sub(1).and_then(|last| self.get(last))
    }

    /// Drops every item. Capacity is kept.
    pub fn clear(&mut self) {
        for slot in self.slots.iter_mut() {
            *slot = None;
        }
        self.head = 0;
        self.tail = 0;
        self.len = 0;
        self.version.bump();
    }

    /// Ensures room for at least `additional` more items without further
    /// growth. Grows in the steps the policy would have taken.
    ///
    /// Counts as a mutation only if the buffer is actually replaced.
    ///
    /// # Panics
    ///
    /// Panics if the required capacity overflows `usize`.
    pub fn reserve(&mut self, additional: usize) {
        let Some(required) = self.len.checked_add(additional) else {
            panic!("capacity overflow");
        };
        if required <= self.slots.len() {
            return;
        }

        let capacity = self.policy.capacity_for(self.slots.len(), required);
        self.set_capacity(capacity);
        self.version.bump();
    }

    /// Shrinks the buffer to exactly `len` slots.
    ///
    /// Counts as a mutation only if the buffer is actually replaced.
    pub fn shrink_to_fit(&mut self) {
        if self.slots.len() == self.len {
            return;
        }
        self.set_capacity(self.len);
        self.version.bump();
    }

    /// Creates a fail-fast cursor positioned before the oldest item.
    #[inline]
    pub fn cursor(&self) -> ArrayCursor {
        ArrayCursor {
            seen: Observation::new(self.id, self.version),
            position: Position::NotStarted,
        }
    }

    /// Returns an iterator over the items, oldest first.
    #[inline]
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            queue: self,
            front: 0,
            back: self.len,
        }
    }

    /// Removes items oldest first, yielding each.
    ///
    /// Items not consumed are dropped with the iterator.
    #[inline]
    pub fn drain(&mut self) -> Drain<'_, T> {
        Drain { queue: self }
    }

    /// Moves the live region into a fresh buffer of `capacity` slots.
    ///
    /// Leaves `head` at 0. `tail` is `len`, or 0 when the new buffer is
    /// exactly full so the next write wraps.
    fn set_capacity(&mut self, capacity: usize) {
        debug_assert!(capacity >= self.len);

        let old_capacity = self.slots.len();
        let mut slots = empty_slots(capacity);
        let len = self.len;

        if self.head + len <= old_capacity {
            slots[..len].swap_with_slice(&mut self.slots[self.head..self.head + len]);
        } else {
            let split = old_capacity - self.head;
            slots[..split].swap_with_slice(&mut self.slots[self.head..]);
            slots[split..len].swap_with_slice(&mut self.slots[..len - split]);
        }

        self.slots = slots;
        self.head = 0;
        self.tail = if len == capacity { 0 } else { len };

        trace!(old_capacity, capacity, len, "resized queue buffer");
    }
}

fn empty_slots<T>(capacity: usize) -> Box<[Option<T>]> {
    core::iter::repeat_with(|| None).take(capacity).collect()
}

impl<T> FifoQueue<T> for ArrayQueue<T> {
    type Cursor = ArrayCursor;

    #[inline]
    fn enqueue(&mut self, item: T) {
        ArrayQueue::enqueue(self, item);
    }

    #[inline]
    fn dequeue(&mut self) -> Result<T, QueueError> {
        ArrayQueue::dequeue(self)
    }

    #[inline]
    fn front(&self) -> Option<&T> {
        ArrayQueue::front(self)
    }

    #[inline]
    fn len(&self) -> usize {
        self.len
    }

    #[inline]
    fn version(&self) -> Version {
        self.version
    }

    #[inline]
    fn id(&self) -> QueueId {
        self.id
    }

    #[inline]
    fn cursor(&self) -> ArrayCursor {
        ArrayQueue::cursor(self)
    }
}

impl<T> Default for ArrayQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for ArrayQueue<T> {
    /// Clones the items. The clone is a distinct queue: cursors from the
    /// original are rejected by it.
    fn clone(&self) -> Self {
        Self {
            slots: self.slots.clone(),
            head: self.head,
            tail: self.tail,
            len: self.len,
            version: self.version,
            id: QueueId::next(),
            policy: self.policy,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for ArrayQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for ArrayQueue<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for ArrayQueue<T> {}

impl<T> Extend<T> for ArrayQueue<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.enqueue(item);
        }
    }
}

impl<T> FromIterator<T> for ArrayQueue<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut queue = Self::with_capacity(iter.size_hint().0);
        queue.extend(iter);
        queue
    }
}

impl<T> IntoIterator for ArrayQueue<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        IntoIter { queue: self }
    }
}

impl<'a, T> IntoIterator for &'a ArrayQueue<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

// =============================================================================
// Cursor
// =============================================================================

/// Fail-fast cursor over an [`ArrayQueue`].
///
/// Holds a logical position and the queue's identity and version at creation.
/// See [`QueueCursor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrayCursor {
    seen: Observation,
    position: Position<usize>,
}

impl ArrayCursor {
    /// Returns the cursor's position.
    #[inline]
    pub fn position(&self) -> Position<usize> {
        self.position
    }

    /// Returns the queue identity and version seen at creation.
    #[inline]
    pub fn observation(&self) -> Observation {
        self.seen
    }
}

impl<T> QueueCursor<T, ArrayQueue<T>> for ArrayCursor {
    fn advance(&mut self, queue: &ArrayQueue<T>) -> Result<bool, QueueError> {
        self.seen.validate(queue.id, queue.version)?;

        let next = match self.position {
            Position::Exhausted => return Ok(false),
            Position::NotStarted => 0,
            Position::At(index) => index + 1,
        };

        if next >= queue.len {
            self.position = Position::Exhausted;
            return Ok(false);
        }

        self.position = Position::At(next);
        Ok(true)
    }

    fn current<'q>(&self, queue: &'q ArrayQueue<T>) -> Result<&'q T, QueueError> {
        let Position::At(index) = self.position else {
            return Err(QueueError::CursorOutOfRange);
        };
        self.seen.validate(queue.id, queue.version)?;
        queue.get(index).ok_or(QueueError::CursorOutOfRange)
    }

    fn reset(&mut self, queue: &ArrayQueue<T>) -> Result<(), QueueError> {
        self.seen.validate(queue.id, queue.version)?;
        self.position = Position::NotStarted;
        Ok(())
    }
}

// =============================================================================
// Iterators
// =============================================================================

/// Iterator over references to queue items, oldest first.
pub struct Iter<'a, T> {
    queue: &'a ArrayQueue<T>,
    front: usize,
    back: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        let item = self.queue.get(self.front);
        self.front += 1;
        item
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        self.back -= 1;
        self.queue.get(self.back)
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

/// Iterator that dequeues items. Created by [`ArrayQueue::drain`].
pub struct Drain<'a, T> {
    queue: &'a mut ArrayQueue<T>,
}

impl<T> Iterator for Drain<'_, T> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.queue.dequeue().ok()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.queue.len, Some(self.queue.len))
    }
}

impl<T> ExactSizeIterator for Drain<'_, T> {}

impl<T> Drop for Drain<'_, T> {
    fn drop(&mut self) {
        for _ in self.by_ref() {}
    }
}

/// Owning iterator. Created by `ArrayQueue::into_iter`.
pub struct IntoIter<T> {
    queue: ArrayQueue<T>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.queue.dequeue().ok()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.queue.len, Some(self.queue.len))
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}
