//! Synthetic Storage-Node Workload
//!
//! Drives a read cache the way a storage node's read/write path does: each
//! persisted entry is put into the cache, and reads check the cache before
//! falling back to the durable store.

use serde::Serialize;
use tracing::{debug, warn};

use crate::cache::{EvictionPolicy, ReadCache};
use crate::error::{CacheError, Result};

/// How far behind the write head readers look, in entries.
const READ_LAG: i64 = 64;

// == Worker Report ==
/// Outcome of one worker's run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WorkerReport {
    /// Entries put into the cache after being "persisted"
    pub puts: u64,
    /// Reads served from the cache
    pub cache_hits: u64,
    /// Reads that had to fall back to the durable store
    pub fallbacks: u64,
    /// Reads whose cached bytes differed from what was written
    pub corrupt_reads: u64,
}

impl WorkerReport {
    /// Adds another worker's counts into this one.
    pub fn merge(&mut self, other: &WorkerReport) {
        self.puts += other.puts;
        self.cache_hits += other.cache_hits;
        self.fallbacks += other.fallbacks;
        self.corrupt_reads += other.corrupt_reads;
    }
}

/// Deterministic payload for an entry, so readers can verify what they get back.
pub fn entry_payload(owner_id: i64, sequence_id: i64, size: usize) -> Vec<u8> {
    let seed = owner_id.wrapping_mul(31).wrapping_add(sequence_id) as u64;
    (0..size)
        .map(|i| (seed.wrapping_add(i as u64) % 251) as u8)
        .collect()
}

// == Run Worker ==
/// Writes `entries` entries for ledger `owner_id` and reads back lagging ones.
///
/// Stops early, without error, when the cache is closed underneath it.
pub fn run_worker<P: EvictionPolicy>(
    cache: &ReadCache<P>,
    owner_id: i64,
    entries: u64,
    entry_size: usize,
) -> Result<WorkerReport> {
    let mut report = WorkerReport::default();

    for sequence_id in 0..entries as i64 {
        let payload = entry_payload(owner_id, sequence_id, entry_size);
        match cache.put(owner_id, sequence_id, &payload) {
            Ok(()) => report.puts += 1,
            Err(CacheError::Closed) => {
                debug!(owner_id, sequence_id, "cache closed, worker stopping");
                break;
            }
            Err(err) => return Err(err),
        }

        let read_id = sequence_id - READ_LAG;
        if read_id < 0 {
            continue;
        }
        match cache.get(owner_id, read_id) {
            Ok(Some(view)) => {
                report.cache_hits += 1;
                if view.as_ref() != entry_payload(owner_id, read_id, entry_size).as_slice() {
                    warn!(owner_id, read_id, "cached entry does not match written bytes");
                    report.corrupt_reads += 1;
                }
            }
            // The durable store would serve this read
            Ok(None) => report.fallbacks += 1,
            Err(CacheError::Closed) => break,
            Err(err) => return Err(err),
        }
    }

    Ok(report)
}
