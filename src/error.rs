//! Error types for the read cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the read cache.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Put with a negative owner id
    #[error("Invalid key: owner id {owner_id} (sequence id {sequence_id}) must not be negative")]
    InvalidKey { owner_id: i64, sequence_id: i64 },

    /// Put without payload bytes
    #[error("Invalid payload: entry payload must not be empty")]
    InvalidPayload,

    /// Payload can never fit, even in an empty cache
    #[error("Oversized payload: {len} bytes exceeds cache capacity of {capacity} bytes")]
    OversizedPayload { len: u64, capacity: u64 },

    /// The eviction policy could not free enough room
    #[error("Cache full: {len} bytes requested, {available} bytes available")]
    CacheFull { len: u64, available: u64 },

    /// Operation on a cache that has already been closed
    #[error("Cache is closed")]
    Closed,

    /// Cache constructed with an unusable byte budget
    #[error("Invalid capacity: {0} bytes")]
    InvalidCapacity(u64),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

// == Result Type Alias ==
/// Convenience Result type for the read cache.
pub type Result<T> = std::result::Result<T, CacheError>;
