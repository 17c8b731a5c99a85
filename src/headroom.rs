//! Front/back reserve bookkeeping for growable buffers.
//!
//! Extendable axes reserve free slots before and after their logical range so
//! that repeated extension does not reallocate on every call. The same
//! bookkeeping is kept per dimension by the bin store, so both stay in step.

/// Free slots around a logical range plus the reserve restored on reallocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Headroom {
    front: usize,
    back: usize,
    max_front: usize,
    max_back: usize,
}

impl Headroom {
    /// Fresh headroom with the full reserve available on both sides.
    pub fn new(max_front: usize, max_back: usize) -> Self {
        Self {
            front: max_front,
            back: max_back,
            max_front,
            max_back,
        }
    }

    /// Free slots before the logical range.
    #[inline]
    pub fn front(&self) -> usize {
        self.front
    }

    /// Free slots after the logical range.
    #[inline]
    pub fn back(&self) -> usize {
        self.back
    }

    pub fn max_front(&self) -> usize {
        self.max_front
    }

    pub fn max_back(&self) -> usize {
        self.max_back
    }

    /// Claims `n` slots before the range.
    ///
    /// Returns `true` when the reserve is exhausted; the caller must then
    /// reallocate with [`front`](Self::front) / [`back`](Self::back) free
    /// slots, which are reset to the full reserve.
    pub fn claim_front(&mut self, n: usize) -> bool {
        if n <= self.front {
            self.front -= n;
            false
        } else {
            self.refill();
            true
        }
    }

    /// Claims `n` slots after the range. See [`claim_front`](Self::claim_front).
    pub fn claim_back(&mut self, n: usize) -> bool {
        if n <= self.back {
            self.back -= n;
            false
        } else {
            self.refill();
            true
        }
    }

    fn refill(&mut self) {
        self.front = self.max_front;
        self.back = self.max_back;
    }
}
