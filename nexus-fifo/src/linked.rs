//! Singly-linked FIFO queue over keyed node storage.
//!
//! Nodes live in a [`Storage`] arena (a `slab::Slab` by default) and link to
//! their successor by key. The queue keeps the keys of the oldest and newest
//! nodes, so both ends are O(1) and no traversal is needed to enqueue.
//!
//! Traversal follows the same fail-fast contract as
//! [`ArrayQueue`](crate::ArrayQueue): a [`LinkedCursor`] walks `next` keys
//! instead of computing positions, and rejects a mutated queue on every step.
//!
//! # Example
//!
//! ```
//! use nexus_fifo::{LinkedQueue, QueueCursor};
//!
//! let mut queue: LinkedQueue<&str> = LinkedQueue::new();
//! queue.enqueue("a");
//! queue.enqueue("b");
//!
//! let mut cursor = queue.cursor();
//! assert!(cursor.advance(&queue).unwrap());
//! assert_eq!(cursor.current(&queue), Ok(&"a"));
//!
//! assert_eq!(queue.dequeue(), Ok("a"));
//! assert!(cursor.advance(&queue).is_err());
//! ```

use core::fmt;
use core::iter::FusedIterator;
use core::marker::PhantomData;

use crate::queue::Position;
use crate::{FifoQueue, Observation, QueueCursor, QueueError, QueueId, Storage, Version};

/// Default node storage for [`LinkedQueue`].
pub type SlabNodes<T> = slab::Slab<Node<T, usize>>;

/// A queue node: one item and the key of its successor.
#[derive(Debug)]
pub struct Node<T, K = usize> {
    value: T,
    next: Option<K>,
}

/// A FIFO queue built from linked nodes.
///
/// # Type Parameters
///
/// - `T`: Element type
/// - `S`: Node storage (default [`SlabNodes<T>`])
/// - `K`: Storage key type (default `usize`)
pub struct LinkedQueue<T, S = SlabNodes<T>, K = usize> {
    storage: S,
    head: Option<K>,
    tail: Option<K>,
    len: usize,
    version: Version,
    id: QueueId,
    _marker: PhantomData<T>,
}

impl<T> LinkedQueue<T> {
    /// Creates an empty queue.
    #[inline]
    pub fn new() -> Self {
        Self::with_storage(slab::Slab::new())
    }

    /// Creates an empty queue with node storage for `capacity` items.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_storage(slab::Slab::with_capacity(capacity))
    }
}

impl<T, S, K> LinkedQueue<T, S, K>
where
    S: Storage<Node<T, K>, Key = K>,
    K: Copy + Eq,
{
    /// Creates an empty queue over `storage`.
    ///
    /// # Panics
    ///
    /// Panics if `storage` is not empty.
    pub fn with_storage(storage: S) -> Self {
        assert!(storage.is_empty(), "node storage must start empty");
        Self {
            storage,
            head: None,
            tail: None,
            len: 0,
            version: Version::default(),
            id: QueueId::next(),
            _marker: PhantomData,
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

    /// Appends an item at the back.
    pub fn enqueue(&mut self, item: T) {
        let key = self.storage.insert(Node {
            value: item,
            next: None,
        });

        match self.tail.and_then(|tail| self.storage.get_mut(tail)) {
            Some(last) => last.next = Some(key),
            None => self.head = Some(key),
        }
        self.tail = Some(key);
        self.len += 1;
        self.version.bump();
    }

    /// Removes and returns the oldest item.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::Empty`] if the queue holds no items.
    pub fn dequeue(&mut self) -> Result<T, QueueError> {
        let head = self.head.ok_or(QueueError::Empty)?;
        let node = self.storage.remove(head).ok_or(QueueError::Empty)?;

        self.head = node.next;
        if self.head.is_none() {
            self.tail = None;
        }
        self.len -= 1;
        self.version.bump();
        Ok(node.value)
    }

    /// Returns the oldest item.
    #[inline]
    pub fn front(&self) -> Option<&T> {
        self.value(self.head)
    }

    /// Returns the newest item.
    #[inline]
    pub fn back(&self) -> Option<&T> {
        self.value(self.tail)
    }

    /// Drops every item.
    pub fn clear(&mut self) {
        self.storage.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
        self.version.bump();
    }

    /// Creates a fail-fast cursor positioned before the oldest item.
    #[inline]
    pub fn cursor(&self) -> LinkedCursor<K> {
        LinkedCursor {
            seen: Observation::new(self.id, self.version),
            position: Position::NotStarted,
        }
    }

    /// Returns an iterator over the items, oldest first.
    #[inline]
    pub fn iter(&self) -> Iter<'_, T, S, K> {
        Iter {
            storage: &self.storage,
            next: self.head,
            remaining: self.len,
            _marker: PhantomData,
        }
    }

    /// Removes items oldest first, yielding each.
    ///
    /// Items not consumed are dropped with the iterator.
    #[inline]
    pub fn drain(&mut self) -> Drain<'_, T, S, K> {
        Drain { queue: self }
    }

    #[inline]
    fn value(&self, key: Option<K>) -> Option<&T> {
        key.and_then(|key| self.storage.get(key)).map(|node| &node.value)
    }
}

impl<T, S, K> FifoQueue<T> for LinkedQueue<T, S, K>
where
    S: Storage<Node<T, K>, Key = K>,
    K: Copy + Eq,
{
    type Cursor = LinkedCursor<K>;

    #[inline]
    fn enqueue(&mut self, item: T) {
        LinkedQueue::enqueue(self, item);
    }

    #[inline]
    fn dequeue(&mut self) -> Result<T, QueueError> {
        LinkedQueue::dequeue(self)
    }

    #[inline]
    fn front(&self) -> Option<&T> {
        LinkedQueue::front(self)
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
    fn cursor(&self) -> LinkedCursor<K> {
        LinkedQueue::cursor(self)
    }
}

impl<T, S, K> Default for LinkedQueue<T, S, K>
where
    S: Storage<Node<T, K>, Key = K> + Default,
    K: Copy + Eq,
{
    fn default() -> Self {
        Self::with_storage(S::default())
    }
}

impl<T, S, K> fmt::Debug for LinkedQueue<T, S, K>
where
    T: fmt::Debug,
    S: Storage<Node<T, K>, Key = K>,
    K: Copy + Eq,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T, S, K> PartialEq for LinkedQueue<T, S, K>
where
    T: PartialEq,
    S: Storage<Node<T, K>, Key = K>,
    K: Copy + Eq,
{
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T, S, K> Extend<T> for LinkedQueue<T, S, K>
where
    S: Storage<Node<T, K>, Key = K>,
    K: Copy + Eq,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.enqueue(item);
        }
    }
}

impl<T, S, K> FromIterator<T> for LinkedQueue<T, S, K>
where
    S: Storage<Node<T, K>, Key = K> + Default,
    K: Copy + Eq,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut queue = Self::default();
        queue.extend(iter);
        queue
    }
}

impl<T, S, K> IntoIterator for LinkedQueue<T, S, K>
where
    S: Storage<Node<T, K>, Key = K>,
    K: Copy + Eq,
{
    type Item = T;
    type IntoIter = IntoIter<T, S, K>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter { queue: self }
    }
}

impl<'a, T, S, K> IntoIterator for &'a LinkedQueue<T, S, K>
where
    S: Storage<Node<T, K>, Key = K>,
    K: Copy + Eq,
{
    type Item = &'a T;
    type IntoIter = Iter<'a, T, S, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// =============================================================================
// Cursor
// =============================================================================

/// Fail-fast cursor over a [`LinkedQueue`].
///
/// Holds the key of the node under the cursor and the queue's identity and
/// version at creation. See [`QueueCursor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkedCursor<K = usize> {
    seen: Observation,
    position: Position<K>,
}

impl<K: Copy> LinkedCursor<K> {
    /// Returns the cursor's position as a node key.
    #[inline]
    pub fn position(&self) -> Position<K> {
        self.position
    }

    /// Returns the queue identity and version seen at creation.
    #[inline]
    pub fn observation(&self) -> Observation {
        self.seen
    }
}

impl<T, S, K> QueueCursor<T, LinkedQueue<T, S, K>> for LinkedCursor<K>
where
    S: Storage<Node<T, K>, Key = K>,
    K: Copy + Eq,
{
    fn advance(&mut self, queue: &LinkedQueue<T, S, K>) -> Result<bool, QueueError> {
        self.seen.validate(queue.id, queue.version)?;

        let next = match self.position {
            Position::Exhausted => return Ok(false),
            Position::NotStarted => queue.head,
            Position::At(key) => queue.storage.get(key).and_then(|node| node.next),
        };

        match next {
            Some(key) => {
                self.position = Position::At(key);
                Ok(true)
            }
            None => {
                self.position = Position::Exhausted;
                Ok(false)
            }
        }
    }

    fn current<'q>(&self, queue: &'q LinkedQueue<T, S, K>) -> Result<&'q T, QueueError> {
        let Position::At(key) = self.position else {
            return Err(QueueError::CursorOutOfRange);
        };
        self.seen.validate(queue.id, queue.version)?;
        queue.value(Some(key)).ok_or(QueueError::CursorOutOfRange)
    }

    fn reset(&mut self, queue: &LinkedQueue<T, S, K>) -> Result<(), QueueError> {
        self.seen.validate(queue.id, queue.version)?;
        self.position = Position::NotStarted;
        Ok(())
    }
}

// =============================================================================
// Iterators
// =============================================================================

/// Iterator over references to queue items, oldest first.
pub struct Iter<'a, T, S, K> {
    storage: &'a S,
    next: Option<K>,
    remaining: usize,
    _marker: PhantomData<T>,
}

impl<'a, T: 'a, S, K: 'a> Iterator for Iter<'a, T, S, K>
where
    S: Storage<Node<T, K>, Key = K>,
    K: Copy + Eq,
{
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let node = self.storage.get(self.next?)?;
        self.next = node.next;
        self.remaining -= 1;
        Some(&node.value)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T: 'a, S, K: 'a> ExactSizeIterator for Iter<'a, T, S, K>
where
    S: Storage<Node<T, K>, Key = K>,
    K: Copy + Eq,
{
}

impl<'a, T: 'a, S, K: 'a> FusedIterator for Iter<'a, T, S, K>
where
    S: Storage<Node<T, K>, Key = K>,
    K: Copy + Eq,
{
}

/// Iterator that dequeues items. Created by [`LinkedQueue::drain`].
pub struct Drain<'a, T, S, K>
where
    S: Storage<Node<T, K>, Key = K>,
    K: Copy + Eq,
{
    queue: &'a mut LinkedQueue<T, S, K>,
}

impl<T, S, K> Iterator for Drain<'_, T, S, K>
where
    S: Storage<Node<T, K>, Key = K>,
    K: Copy + Eq,
{
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

impl<T, S, K> ExactSizeIterator for Drain<'_, T, S, K>
where
    S: Storage<Node<T, K>, Key = K>,
    K: Copy + Eq,
{
}

impl<T, S, K> Drop for Drain<'_, T, S, K>
where
    S: Storage<Node<T, K>, Key = K>,
    K: Copy + Eq,
{
    fn drop(&mut self) {
        // Exhaust remaining elements to ensure cleanup
        for _ in self.by_ref() {}
    }
}

/// Owning iterator. Created by `LinkedQueue::into_iter`.
pub struct IntoIter<T, S, K> {
    queue: LinkedQueue<T, S, K>,
}

impl<T, S, K> Iterator for IntoIter<T, S, K>
where
    S: Storage<Node<T, K>, Key = K>,
    K: Copy + Eq,
{
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

impl<T, S, K> ExactSizeIterator for IntoIter<T, S, K>
where
    S: Storage<Node<T, K>, Key = K>,
    K: Copy + Eq,
{
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn new_is_empty() {
        let queue: LinkedQueue<u64> = LinkedQueue::new();
        assert!(queue.is_empty());
        assert_eq!(queue.len(), 0);
        assert!(queue.front().is_none());
        assert!(queue.back().is_none());
    }

    #[test]
    fn enqueue_dequeue_order() {
        let mut queue: LinkedQueue<u64> = LinkedQueue::new();
        queue.enqueue(1);
        queue.enqueue(2);
        queue.enqueue(3);

        assert_eq!(queue.len(), 3);
        assert_eq!(queue.front(), Some(&1));
        assert_eq!(queue.back(), Some(&3));

        assert_eq!(queue.dequeue(), Ok(1));
        assert_eq!(queue.dequeue(), Ok(2));
        assert_eq!(queue.dequeue(), Ok(3));
        assert_eq!(queue.dequeue(), Err(QueueError::Empty));
        assert!(queue.back().is_none());
    }

    #[test]
    fn refill_after_empty() {
        let mut queue: LinkedQueue<u64> = LinkedQueue::with_capacity(2);
        queue.enqueue(1);
        assert_eq!(queue.dequeue(), Ok(1));

        queue.enqueue(2);
        queue.enqueue(3);
        assert_eq!(queue.front(), Some(&2));
        assert_eq!(queue.back(), Some(&3));
        assert_eq!(queue.iter().copied().collect::<Vec<_>>(), vec![2, 3]);
    }

    #[test]
    fn dequeue_empty_leaves_state() {
        let mut queue: LinkedQueue<u64> = LinkedQueue::new();
        assert_eq!(queue.dequeue(), Err(QueueError::Empty));
        assert_eq!(queue.version(), Version::new(0));
    }

    #[test]
    fn version_bumps_once_per_call() {
        let mut queue: LinkedQueue<u64> = LinkedQueue::new();
        queue.enqueue(1);
        queue.enqueue(2);
        assert_eq!(queue.version().get(), 2);
        queue.dequeue().unwrap();
        assert_eq!(queue.version().get(), 3);
        queue.clear();
        assert_eq!(queue.version().get(), 4);
    }

    #[test]
    fn dequeue_releases_node() {
        let value = Rc::new(7);
        let mut queue = LinkedQueue::new();
        queue.enqueue(Rc::clone(&value));
        queue.enqueue(Rc::clone(&value));

        drop(queue.dequeue().unwrap());
        assert_eq!(Rc::strong_count(&value), 2);
        assert_eq!(queue.storage.len(), 1);
    }

    #[test]
    fn nodes_are_reused() {
        let mut queue: LinkedQueue<u64> = LinkedQueue::new();
        for round in 0..100 {
            queue.enqueue(round);
            queue.enqueue(round + 1);
            queue.dequeue().unwrap();
            queue.dequeue().unwrap();
        }
        assert!(queue.storage.capacity() <= 4);
    }

    #[test]
    #[should_panic(expected = "node storage must start empty")]
    fn with_storage_rejects_occupied() {
        let mut nodes: SlabNodes<u64> = slab::Slab::new();
        nodes.insert(Node {
            value: 1,
            next: None,
        });
        let _queue: LinkedQueue<u64> = LinkedQueue::with_storage(nodes);
    }

    #[test]
    fn clear_drops_items() {
        let mut queue: LinkedQueue<u64> = (0..5).collect();
        queue.clear();
        assert!(queue.is_empty());
        assert!(queue.front().is_none());

        queue.enqueue(9);
        assert_eq!(queue.dequeue(), Ok(9));
    }

    #[test]
    fn iter_and_drain() {
        let mut queue: LinkedQueue<u64> = (0..4).collect();
        let mut iter = queue.iter();
        assert_eq!(iter.len(), 4);
        assert_eq!(iter.next(), Some(&0));
        assert_eq!(iter.len(), 3);

        {
            let mut drain = queue.drain();
            assert_eq!(drain.next(), Some(0));
        }
        assert!(queue.is_empty());
    }

    #[test]
    fn into_iter_and_debug() {
        let queue: LinkedQueue<u64> = (1..4).collect();
        assert_eq!(format!("{queue:?}"), "[1, 2, 3]");
        assert_eq!(queue.into_iter().collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn iterators_report_exact_len() {
        let mut queue: LinkedQueue<u64> = (1..5).collect();
        queue.dequeue().unwrap();

        let mut iter = queue.iter();
        assert_eq!(iter.len(), 3);
        iter.next();
        assert_eq!(iter.len(), 2);
        assert_eq!(iter.copied().collect::<Vec<_>>(), vec![3, 4]);

        let mut owned = queue.into_iter();
        assert_eq!(owned.len(), 3);
        assert_eq!(owned.next(), Some(2));
        assert_eq!(owned.len(), 2);
    }

    // =========================================================================
    // Cursor
    // =========================================================================

    #[test]
    fn cursor_walks_then_exhausts() {
        let queue: LinkedQueue<u64> = (1..4).collect();
        let mut cursor = queue.cursor();

        assert_eq!(cursor.current(&queue), Err(QueueError::CursorOutOfRange));

        let mut seen = Vec::new();
        while cursor.advance(&queue).unwrap() {
            seen.push(*cursor.current(&queue).unwrap());
        }
        assert_eq!(seen, vec![1, 2, 3]);

        assert_eq!(cursor.position(), Position::Exhausted);
        assert_eq!(cursor.current(&queue), Err(QueueError::CursorOutOfRange));
        assert_eq!(cursor.advance(&queue), Ok(false));
    }

    #[test]
    fn cursor_over_empty_queue() {
        let queue: LinkedQueue<u64> = LinkedQueue::new();
        let mut cursor = queue.cursor();
        assert_eq!(cursor.advance(&queue), Ok(false));
    }

    #[test]
    fn cursor_detects_mutation() {
        let mut queue: LinkedQueue<u64> = (1..4).collect();
        let mut cursor = queue.cursor();
        assert_eq!(cursor.advance(&queue), Ok(true));

        queue.dequeue().unwrap();
        assert!(cursor.advance(&queue).unwrap_err().is_stale());
        assert!(cursor.current(&queue).unwrap_err().is_stale());
        assert!(cursor.reset(&queue).unwrap_err().is_stale());
    }

    #[test]
    fn cursor_rejects_other_queue() {
        let a: LinkedQueue<u64> = (1..4).collect();
        let b: LinkedQueue<u64> = (1..4).collect();
        let mut cursor = a.cursor();
        assert_eq!(cursor.advance(&b), Err(QueueError::ForeignQueue));
        assert_eq!(cursor.observation().queue(), a.id());
        assert_eq!(cursor.observation().version(), a.version());
    }

    #[test]
    fn cursor_reset_restarts() {
        let queue: LinkedQueue<u64> = (1..3).collect();
        let mut cursor = queue.cursor();
        while cursor.advance(&queue).unwrap() {}

        cursor.reset(&queue).unwrap();
        assert_eq!(cursor.position(), Position::NotStarted);
        assert_eq!(cursor.advance(&queue), Ok(true));
        assert_eq!(cursor.current(&queue), Ok(&1));
    }
}
