//! Eviction Policy Module
//!
//! Decides which resident entries leave the cache when an admission needs room.
//! The default policy is FIFO over insertion order.

use std::collections::BTreeMap;

use crate::cache::CacheKey;

// == Eviction Policy ==
/// Tracks resident keys and nominates eviction victims.
///
/// Every admitted key gets a stamp from [`admit`](Self::admit). The cache hands
/// the stamp back through [`forget`](Self::forget) whenever the key leaves,
/// whether by replacement or eviction.
pub trait EvictionPolicy {
    /// Registers a newly admitted key and returns its stamp.
    fn admit(&mut self, key: CacheKey) -> u64;

    /// Drops the key registered under `stamp`.
    fn forget(&mut self, stamp: u64);

    /// Keys the policy is willing to evict, first victim first.
    ///
    /// Must not change policy state. An empty iterator means nothing may be
    /// evicted, so admissions that need room are refused.
    fn victims(&self) -> Box<dyn Iterator<Item = CacheKey> + '_>;

    /// Number of tracked keys.
    fn len(&self) -> usize;

    /// Returns true if no keys are tracked.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forgets every tracked key.
    fn clear(&mut self);
}

// == FIFO Policy ==
/// First-in first-out eviction over insertion stamps.
///
/// Stamps increase monotonically, so the smallest stamp is always the oldest
/// admission. Reads never reorder keys; replacing a key gives it a new stamp.
#[derive(Debug, Default)]
pub struct FifoPolicy {
    /// Resident keys ordered by insertion stamp
    order: BTreeMap<u64, CacheKey>,
    /// Stamp handed to the next admission
    next_stamp: u64,
}

impl FifoPolicy {
    // == Constructor ==
    /// Creates a new empty FIFO policy.
    pub fn new() -> Self {
        Self::default()
    }
}

impl EvictionPolicy for FifoPolicy {
    fn admit(&mut self, key: CacheKey) -> u64 {
        let stamp = self.next_stamp;
        self.next_stamp += 1;
        self.order.insert(stamp, key);
        stamp
    }

    fn forget(&mut self, stamp: u64) {
        self.order.remove(&stamp);
    }

    fn victims(&self) -> Box<dyn Iterator<Item = CacheKey> + '_> {
        Box::new(self.order.values().copied())
    }

    fn len(&self) -> usize {
        self.order.len()
    }

    fn clear(&mut self) {
        self.order.clear();
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn key(sequence_id: i64) -> CacheKey {
        CacheKey::new(1, sequence_id)
    }

    fn victims(fifo: &FifoPolicy) -> Vec<CacheKey> {
        fifo.victims().collect()
    }

    #[test]
    fn test_fifo_new() {
        let fifo = FifoPolicy::new();
        assert!(fifo.is_empty());
        assert_eq!(fifo.len(), 0);
        assert!(victims(&fifo).is_empty());
    }

    #[test]
    fn test_fifo_victims_in_insertion_order() {
        let mut fifo = FifoPolicy::new();

        fifo.admit(key(0));
        fifo.admit(key(1));
        fifo.admit(key(2));

        assert_eq!(victims(&fifo), vec![key(0), key(1), key(2)]);
        // Listing victims does not consume them
        assert_eq!(fifo.len(), 3);
    }

    #[test]
    fn test_fifo_stamps_increase() {
        let mut fifo = FifoPolicy::new();

        let a = fifo.admit(key(0));
        let b = fifo.admit(key(1));
        assert!(b > a);
    }

    #[test]
    fn test_fifo_readmit_resets_position() {
        let mut fifo = FifoPolicy::new();

        let first = fifo.admit(key(0));
        fifo.admit(key(1));
        fifo.admit(key(2));

        // Replacement: old stamp forgotten, key re-admitted at the tail
        fifo.forget(first);
        fifo.admit(key(0));

        assert_eq!(fifo.len(), 3);
        assert_eq!(victims(&fifo), vec![key(1), key(2), key(0)]);
    }

    #[test]
    fn test_fifo_forget_evicted_stamp() {
        let mut fifo = FifoPolicy::new();

        let oldest = fifo.admit(key(0));
        fifo.admit(key(1));
        fifo.forget(oldest);

        assert_eq!(victims(&fifo), vec![key(1)]);
    }

    #[test]
    fn test_fifo_forget_unknown_stamp() {
        let mut fifo = FifoPolicy::new();

        fifo.admit(key(0));
        fifo.forget(42);

        assert_eq!(fifo.len(), 1);
        assert_eq!(victims(&fifo), vec![key(0)]);
    }

    #[test]
    fn test_fifo_clear() {
        let mut fifo = FifoPolicy::new();

        fifo.admit(key(0));
        fifo.admit(key(1));
        fifo.clear();

        assert!(fifo.is_empty());
        assert!(victims(&fifo).is_empty());
    }
}
