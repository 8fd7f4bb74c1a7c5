//! Mutation counters and queue identity.
//!
//! Every queue carries a [`Version`] that advances on each structural
//! mutation, and a [`QueueId`] that distinguishes it from every other queue in
//! the process. A cursor records both in an [`Observation`] when it is created
//! and re-checks them on every step.

use core::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::trace;

use crate::QueueError;

/// Monotonic mutation counter.
///
/// Starts at zero and advances by exactly one per mutating call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version(u64);

impl Version {
    /// Creates a version with the given raw value.
    #[inline]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw counter value.
    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Advances the counter by one.
    #[inline]
    pub(crate) fn bump(&mut self) {
        self.0 = self.0.wrapping_add(1);
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Process-unique identity of a queue instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QueueId(u64);

static NEXT_QUEUE_ID: AtomicU64 = AtomicU64::new(0);

impl QueueId {
    /// Draws a fresh identity.
    #[inline]
    pub(crate) fn next() -> Self {
        Self(NEXT_QUEUE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// The queue identity and version a cursor was created against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Observation {
    queue: QueueId,
    version: Version,
}

impl Observation {
    #[inline]
    pub(crate) const fn new(queue: QueueId, version: Version) -> Self {
        Self { queue, version }
    }

    /// Identity of the observed queue.
    #[inline]
    pub const fn queue(&self) -> QueueId {
        self.queue
    }

    /// Version of the queue at observation time.
    #[inline]
    pub const fn version(&self) -> Version {
        self.version
    }

    /// Checks that `queue` at `current` is still what was observed.
    ///
    /// Identity is checked before version.
    #[inline]
    pub(crate) fn validate(&self, queue: QueueId, current: Version) -> Result<(), QueueError> {
        if self.queue != queue {
            return Err(QueueError::ForeignQueue);
        }
        if self.version != current {
            trace!(
                observed = self.version.get(),
                current = current.get(),
                "stale cursor"
            );
            return Err(QueueError::StaleCursor {
                observed: self.version,
                current,
            });
        }
        Ok(())
    }
}
