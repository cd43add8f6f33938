//! Cache Store Module
//!
//! Main read cache engine combining a composite-key index with a fixed byte
//! budget and FIFO eviction.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use bytes::Bytes;
use parking_lot::RwLock;
use tracing::{debug, info};

use crate::cache::{
    Arena, CacheEntry, CacheKey, CacheStats, EvictionPolicy, FifoPolicy, StatsRecorder,
};
use crate::config::Config;
use crate::error::{CacheError, Result};

// == Resident Set ==
/// Index, eviction order and byte budget; always mutated together.
#[derive(Debug)]
struct ResidentSet<P> {
    index: HashMap<CacheKey, CacheEntry>,
    policy: P,
    arena: Arena,
}

impl<P: EvictionPolicy> ResidentSet<P> {
    /// Picks the victims that make room for `len` bytes under `key`.
    ///
    /// Read-only. Returns `None` when the policy runs out of victims first.
    fn plan_evictions(&self, key: CacheKey, len: u64) -> Option<Vec<CacheKey>> {
        // A replaced entry gives its bytes back without counting as a victim
        let replaced = self.index.get(&key).map_or(0, CacheEntry::len);
        let mut available = self.arena.available() + replaced;
        let mut victims = Vec::new();
        if len <= available {
            return Some(victims);
        }

        for victim in self.policy.victims() {
            if victim == key {
                continue;
            }
            let Some(entry) = self.index.get(&victim) else {
                continue;
            };
            available += entry.len();
            victims.push(victim);
            if len <= available {
                return Some(victims);
            }
        }
        None
    }

    /// Makes `payload` resident under `key`, returning how many entries were evicted.
    ///
    /// Nothing changes when the room cannot be found.
    fn admit(&mut self, key: CacheKey, payload: Bytes) -> Result<u64> {
        let len = payload.len() as u64;
        let victims = self
            .plan_evictions(key, len)
            .ok_or(CacheError::CacheFull {
                len,
                available: self.arena.available(),
            })?;

        // Replacement releases the old bytes and its place in the eviction order
        if let Some(old) = self.index.remove(&key) {
            self.policy.forget(old.stamp);
            self.arena.release(old.len());
        }

        let evicted = victims.len() as u64;
        for victim in victims {
            if let Some(entry) = self.index.remove(&victim) {
                self.policy.forget(entry.stamp);
                self.arena.release(entry.len());
                debug!(key = %victim, bytes = entry.len(), "evicted entry");
            }
        }

        let stamp = self.policy.admit(key);
        self.arena.charge(len);
        self.index.insert(key, CacheEntry::new(payload, stamp));
        debug_assert_eq!(self.policy.len(), self.index.len());
        Ok(evicted)
    }
}

// == Read Cache ==
/// Bounded-capacity cache of ledger entries keyed by `(owner id, sequence id)`.
///
/// Safe to share between threads behind an `Arc`. Lookups take a shared lock
/// and never change eviction order; puts take the exclusive lock only after
/// the payload has been validated and copied.
#[derive(Debug)]
pub struct ReadCache<P = FifoPolicy> {
    /// Resident set, `None` once closed
    resident: RwLock<Option<ResidentSet<P>>>,
    /// Fast-path closed flag for puts
    closed: AtomicBool,
    /// Byte budget fixed at construction
    capacity: u64,
    /// Performance statistics
    stats: StatsRecorder,
}

impl ReadCache<FifoPolicy> {
    // == Constructor ==
    /// Creates a new ReadCache with FIFO eviction and the given byte budget.
    ///
    /// # Errors
    /// `InvalidCapacity` if `capacity_bytes` is zero.
    pub fn new(capacity_bytes: u64) -> Result<Self> {
        Self::with_policy(capacity_bytes, FifoPolicy::new())
    }

    /// Creates a new ReadCache sized from the configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.capacity_bytes)
    }
}

impl<P: EvictionPolicy> ReadCache<P> {
    /// Creates a new ReadCache with a caller-supplied eviction policy.
    pub fn with_policy(capacity_bytes: u64, mut policy: P) -> Result<Self> {
        if capacity_bytes == 0 {
            return Err(CacheError::InvalidCapacity(capacity_bytes));
        }
        policy.clear();

        info!(capacity_bytes, "read cache created");
        Ok(Self {
            resident: RwLock::new(Some(ResidentSet {
                index: HashMap::new(),
                policy,
                arena: Arena::new(capacity_bytes),
            })),
            closed: AtomicBool::new(false),
            capacity: capacity_bytes,
            stats: StatsRecorder::new(),
        })
    }

    // == Put ==
    /// Copies `payload` into the cache under `(owner_id, sequence_id)`.
    ///
    /// Oldest-inserted entries are evicted until the payload fits. An existing
    /// entry for the same key is replaced and moves to the back of the eviction
    /// order. Negative sequence ids are accepted.
    ///
    /// # Errors
    /// - `Closed` after [`close`](Self::close)
    /// - `InvalidKey` if `owner_id` is negative
    /// - `InvalidPayload` if `payload` is empty
    /// - `OversizedPayload` if `payload` is larger than the whole cache
    /// - `CacheFull` if the eviction policy cannot free enough room
    ///
    /// No rejected put changes the cache contents.
    pub fn put(&self, owner_id: i64, sequence_id: i64, payload: &[u8]) -> Result<()> {
        let key = self.check_put(owner_id, sequence_id, payload.len())?;
        self.admit(key, Arena::copy_in(payload))
    }

    /// Like [`put`](Self::put), but takes ownership of `payload` without copying.
    ///
    /// The cache keeps a reference to the buffer `payload` points into, so a
    /// small slice of a large buffer retains the whole allocation while resident.
    pub fn put_bytes(&self, owner_id: i64, sequence_id: i64, payload: Bytes) -> Result<()> {
        let key = self.check_put(owner_id, sequence_id, payload.len())?;
        self.admit(key, payload)
    }

    // == Get ==
    /// Retrieves the payload stored under the exact key.
    ///
    /// Returns `Ok(None)` for keys never inserted or already evicted; ids of
    /// any sign are valid lookups. The returned view stays readable after the
    /// entry is evicted or the cache is closed.
    pub fn get(&self, owner_id: i64, sequence_id: i64) -> Result<Option<Bytes>> {
        let guard = self.resident.read();
        let resident = guard.as_ref().ok_or(CacheError::Closed)?;

        let payload = resident
            .index
            .get(&CacheKey::new(owner_id, sequence_id))
            .map(|entry| entry.payload.clone());

        if payload.is_some() {
            self.stats.record_hit();
        } else {
            self.stats.record_miss();
        }
        Ok(payload)
    }

    // == Has Entry ==
    /// Checks whether an entry is resident without touching its payload.
    pub fn has_entry(&self, owner_id: i64, sequence_id: i64) -> Result<bool> {
        let guard = self.resident.read();
        let resident = guard.as_ref().ok_or(CacheError::Closed)?;
        Ok(resident
            .index
            .contains_key(&CacheKey::new(owner_id, sequence_id)))
    }

    // == Count ==
    /// Returns the number of resident entries.
    pub fn count(&self) -> Result<u64> {
        let guard = self.resident.read();
        let resident = guard.as_ref().ok_or(CacheError::Closed)?;
        Ok(resident.index.len() as u64)
    }

    // == Size ==
    /// Returns the sum of resident payload lengths in bytes.
    pub fn size(&self) -> Result<u64> {
        let guard = self.resident.read();
        let resident = guard.as_ref().ok_or(CacheError::Closed)?;
        Ok(resident.arena.used())
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> Result<CacheStats> {
        let guard = self.resident.read();
        let resident = guard.as_ref().ok_or(CacheError::Closed)?;
        Ok(self.stats.snapshot(
            resident.index.len() as u64,
            resident.arena.used(),
            self.capacity,
        ))
    }

    // == Capacity ==
    /// Returns the byte budget fixed at construction.
    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    // == Close ==
    /// Releases every resident entry and the byte budget.
    ///
    /// Every later operation, including a second `close`, fails with `Closed`.
    /// Views returned by [`get`](Self::get) remain valid.
    pub fn close(&self) -> Result<()> {
        let mut guard = self.resident.write();
        let mut resident = guard.take().ok_or(CacheError::Closed)?;
        self.closed.store(true, Ordering::Release);

        let entries = resident.index.len();
        let bytes = resident.arena.used();
        debug_assert_eq!(resident.policy.len(), entries);
        resident.index.clear();
        resident.policy.clear();
        resident.arena.reset();
        debug_assert!(resident.policy.is_empty());

        info!(entries, bytes, "read cache closed");
        Ok(())
    }

    /// Validates a put before any copying or locking.
    fn check_put(&self, owner_id: i64, sequence_id: i64, len: usize) -> Result<CacheKey> {
        if self.is_closed() {
            return Err(CacheError::Closed);
        }

        let len = len as u64;
        let rejection = if owner_id < 0 {
            Some(CacheError::InvalidKey {
                owner_id,
                sequence_id,
            })
        } else if len == 0 {
            Some(CacheError::InvalidPayload)
        } else if len > self.capacity {
            Some(CacheError::OversizedPayload {
                len,
                capacity: self.capacity,
            })
        } else {
            None
        };

        match rejection {
            Some(err) => {
                self.stats.record_rejection();
                debug!(owner_id, sequence_id, error = %err, "put rejected");
                Err(err)
            }
            None => Ok(CacheKey::new(owner_id, sequence_id)),
        }
    }

    fn admit(&self, key: CacheKey, payload: Bytes) -> Result<()> {
        let mut guard = self.resident.write();
        let resident = guard.as_mut().ok_or(CacheError::Closed)?;

        match resident.admit(key, payload) {
            Ok(evicted) => {
                self.stats.record_evictions(evicted);
                Ok(())
            }
            Err(err) => {
                self.stats.record_rejection();
                debug!(key = %key, error = %err, "put rejected");
                Err(err)
            }
        }
    }
}
