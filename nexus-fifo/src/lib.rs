//! # nexus-fifo
//!
//! Growable first-in-first-out queues with fail-fast versioned cursors.
//!
//! Two interchangeable queues implement the same [`FifoQueue`] contract:
//!
//! | Queue | Storage | Enqueue / Dequeue | Positional read |
//! |-------|---------|-------------------|-----------------|
//! | [`ArrayQueue`] | Growable ring buffer | O(1) amortized | O(1) |
//! | [`LinkedQueue`] | Keyed nodes in a slab | O(1) | - |
//!
//! ## Versioned traversal
//!
//! Every queue keeps a [`Version`] counter that advances on each structural
//! mutation. A cursor records the queue's identity and version when it is
//! created and checks both on every step. A cursor that outlives a mutation
//! fails with [`QueueError::StaleCursor`] instead of reading shifted or
//! missing elements.
//!
//! Cursors hold no reference to their queue, so the queue can be mutated
//! while a cursor exists. Each step is handed the queue:
//!
//! ```
//! use nexus_fifo::{ArrayQueue, QueueCursor, QueueError};
//!
//! let mut queue: ArrayQueue<u64> = ArrayQueue::new();
//! queue.enqueue(1);
//! queue.enqueue(2);
//!
//! let mut cursor = queue.cursor();
//! let mut seen = Vec::new();
//! while cursor.advance(&queue)? {
//!     seen.push(*cursor.current(&queue)?);
//! }
//! assert_eq!(seen, [1, 2]);
//!
//! let mut cursor = queue.cursor();
//! queue.dequeue()?;
//! assert!(cursor.advance(&queue).unwrap_err().is_stale());
//! # Ok::<(), QueueError>(())
//! ```
//!
//! For plain traversal `iter()` borrows the queue, which rules out mutation
//! for the iterator's lifetime.
//!
//! ## Growth
//!
//! [`ArrayQueue`] grows according to its [`GrowthPolicy`]. The default,
//! [`GrowthPolicy::Doubling`], keeps enqueue amortized O(1).
//! [`GrowthPolicy::ExactFit`] grows by one slot at a time and costs O(n²)
//! over n enqueues.
//!
//! ## Thread safety
//!
//! None. Queues assume a single writer; share them behind a lock if needed.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod array;
pub mod error;
pub mod linked;
pub mod policy;
pub mod queue;
pub mod storage;
pub mod version;

pub use array::{ArrayCursor, ArrayQueue};
pub use error::{ErrorKind, QueueError};
pub use linked::{LinkedCursor, LinkedQueue, Node, SlabNodes};
pub use policy::GrowthPolicy;
pub use queue::{FifoQueue, Position, QueueCursor};
pub use storage::Storage;
pub use version::{Observation, QueueId, Version};
