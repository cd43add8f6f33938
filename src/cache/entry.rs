//! Cache Entry Module
//!
//! Defines the composite cache key and the resident entry record.

use std::fmt;

use bytes::Bytes;

// == Cache Key ==
/// Two-level identifier of a ledger entry: owning ledger and position within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey {
    /// Ledger (stream) the entry belongs to
    pub owner_id: i64,
    /// Position of the entry within its ledger
    pub sequence_id: i64,
}

impl CacheKey {
    /// Creates a key; no sign validation happens here.
    pub fn new(owner_id: i64, sequence_id: i64) -> Self {
        Self {
            owner_id,
            sequence_id,
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.owner_id, self.sequence_id)
    }
}

// == Cache Entry ==
/// A resident entry: cache-owned payload plus its eviction-order stamp.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Immutable payload bytes
    pub payload: Bytes,
    /// Insertion stamp assigned by the eviction policy
    pub stamp: u64,
}

impl CacheEntry {
    // == Constructor ==
    pub fn new(payload: Bytes, stamp: u64) -> Self {
        Self { payload, stamp }
    }

    // == Length ==
    /// Payload length in bytes, as charged against the cache budget.
    pub fn len(&self) -> u64 {
        self.payload.len() as u64
    }
}
