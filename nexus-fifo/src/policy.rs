//! Capacity growth policies for [`ArrayQueue`](crate::ArrayQueue).
//!
//! | Policy | New capacity | Cost of n enqueues |
//! |--------|--------------|--------------------|
//! | [`Doubling`](GrowthPolicy::Doubling) | `max(2, 2 * old)` | O(n) amortized |
//! | [`ExactFit`](GrowthPolicy::ExactFit) | `old + 1` | O(n²) |
//!
//! `ExactFit` never over-allocates, at the price of copying the whole queue on
//! every enqueue past capacity. Pick it only for small queues off the hot path.

/// How an [`ArrayQueue`](crate::ArrayQueue) grows when it runs out of slots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum GrowthPolicy {
    /// Double the capacity, starting from 2.
    #[default]
    Doubling,
    /// Grow by exactly one slot.
    ExactFit,
}

impl GrowthPolicy {
    /// Returns the capacity to grow to from `current`.
    ///
    /// Always strictly greater than `current`.
    #[inline]
    pub const fn next_capacity(self, current: usize) -> usize {
        match self {
            Self::Doubling => {
                if current < 2 {
                    2
                } else {
                    current * 2
                }
            }
            Self::ExactFit => current + 1,
        }
    }

    /// Returns the smallest capacity reachable from `current` by repeated
    /// growth that holds at least `required` elements.
    #[inline]
    pub fn capacity_for(self, current: usize, required: usize) -> usize {
        match self {
            Self::Doubling => {
                let mut capacity = current;
                while capacity < required {
                    capacity = self.next_capacity(capacity);
                }
                capacity
            }
            Self::ExactFit => current.max(required),
        }
    }
}
