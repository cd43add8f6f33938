//! Read Cache - A bounded-capacity entry cache for ledger storage nodes
//!
//! Holds recently written or read ledger entries in memory, keyed by
//! `(owner id, sequence id)`, within a fixed byte budget and FIFO eviction.

pub mod cache;
pub mod config;
pub mod error;
pub mod tasks;
pub mod workload;

pub use cache::{CacheStats, ReadCache};
pub use config::Config;
pub use error::{CacheError, Result};
pub use tasks::{close_and_join, spawn_stats_reporter};
