//! Backing Arena Module
//!
//! Owns the cache's fixed byte budget and the payload allocations charged to it.

use bytes::Bytes;

// == Arena ==
/// Fixed-capacity byte budget for resident payloads.
///
/// Payloads are held as reference-counted [`Bytes`]. Releasing an entry returns
/// its length to the budget immediately; the allocation itself is freed when the
/// last outstanding view of it is dropped.
#[derive(Debug)]
pub struct Arena {
    /// Total byte budget, fixed at construction
    capacity: u64,
    /// Sum of lengths of charged payloads
    used: u64,
}

impl Arena {
    // == Constructor ==
    pub fn new(capacity: u64) -> Self {
        Self { capacity, used: 0 }
    }

    // == Copy In ==
    /// Copies caller bytes into a cache-owned allocation.
    pub fn copy_in(payload: &[u8]) -> Bytes {
        Bytes::copy_from_slice(payload)
    }

    /// Returns true if `len` more bytes fit in the remaining budget.
    pub fn fits(&self, len: u64) -> bool {
        len <= self.available()
    }

    /// Charges `len` bytes against the budget.
    ///
    /// Callers must evict until [`fits`](Self::fits) holds first.
    pub fn charge(&mut self, len: u64) {
        debug_assert!(self.fits(len), "arena overcommitted");
        self.used += len;
    }

    /// Returns `len` bytes to the budget.
    pub fn release(&mut self, len: u64) {
        debug_assert!(len <= self.used, "arena released more than charged");
        self.used = self.used.saturating_sub(len);
    }

    /// Returns the whole budget.
    pub fn reset(&mut self) {
        self.used = 0;
    }

    pub fn used(&self) -> u64 {
        self.used
    }

    pub fn available(&self) -> u64 {
        self.capacity - self.used
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arena_new() {
        let arena = Arena::new(1024);
        assert_eq!(arena.used(), 0);
        assert_eq!(arena.available(), 1024);
    }

    #[test]
    fn test_arena_exact_fit() {
        let mut arena = Arena::new(10);
        for _ in 0..10 {
            assert!(arena.fits(1));
            arena.charge(1);
        }
        assert_eq!(arena.used(), 10);
        assert!(!arena.fits(1));
        assert!(arena.fits(0));
    }

    #[test]
    fn test_arena_release_and_reset() {
        let mut arena = Arena::new(100);
        arena.charge(60);
        assert!(!arena.fits(41));

        arena.release(20);
        assert_eq!(arena.used(), 40);
        assert!(arena.fits(60));

        arena.reset();
        assert_eq!(arena.used(), 0);
    }

    #[test]
    fn test_copy_in_detaches_from_caller_buffer() {
        let mut buffer = vec![7u8; 16];
        let owned = Arena::copy_in(&buffer);

        buffer.fill(0);
        assert_eq!(owned.as_ref(), &[7u8; 16][..]);
    }
}
