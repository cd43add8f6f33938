//! Cache Module
//!
//! Provides a bounded-capacity, byte-budgeted entry cache with FIFO eviction.

mod arena;
mod entry;
mod fifo;
mod stats;
mod store;


// Re-export public types
pub use arena::Arena;
pub use entry::{CacheEntry, CacheKey};
pub use fifo::{EvictionPolicy, FifoPolicy};
pub use stats::{CacheStats, StatsRecorder};
pub use store::ReadCache;
