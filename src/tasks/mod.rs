//! Background Tasks Module
//!
//! Contains background tasks that run alongside the cache.
//!
//! # Tasks
//! - Stats reporter: Logs a cache statistics snapshot at configured intervals

mod reporter;

pub use reporter::{close_and_join, spawn_stats_reporter};
