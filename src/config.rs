//! Configuration Module
//!
//! Handles loading and managing cache and workload configuration from environment variables.

use std::env;
use std::str::FromStr;

use crate::error::{CacheError, Result};

/// Default cache budget: 256 MiB
const DEFAULT_CAPACITY_BYTES: u64 = 256 * 1024 * 1024;

/// Read cache and load driver configuration.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Total byte budget of the read cache
    pub capacity_bytes: u64,
    /// Interval in seconds between stats reports
    pub stats_interval: u64,
    /// Number of concurrent workload workers
    pub workers: usize,
    /// Entries each worker writes (and reads back)
    pub entries_per_worker: u64,
    /// Payload size in bytes of each synthetic entry
    pub entry_size: usize,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `READ_CACHE_CAPACITY_BYTES` - Cache byte budget (default: 268435456)
    /// - `STATS_INTERVAL` - Stats report frequency in seconds (default: 5)
    /// - `WORKLOAD_WORKERS` - Concurrent workers (default: 4)
    /// - `WORKLOAD_ENTRIES_PER_WORKER` - Entries per worker (default: 10000)
    /// - `WORKLOAD_ENTRY_SIZE` - Entry payload size in bytes (default: 1024)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            capacity_bytes: env_or("READ_CACHE_CAPACITY_BYTES", defaults.capacity_bytes),
            stats_interval: env_or("STATS_INTERVAL", defaults.stats_interval),
            workers: env_or("WORKLOAD_WORKERS", defaults.workers),
            entries_per_worker: env_or(
                "WORKLOAD_ENTRIES_PER_WORKER",
                defaults.entries_per_worker,
            ),
            entry_size: env_or("WORKLOAD_ENTRY_SIZE", defaults.entry_size),
        }
    }

    /// Rejects values the cache or the load driver cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.capacity_bytes == 0 {
            return Err(CacheError::InvalidConfig(
                "READ_CACHE_CAPACITY_BYTES must be greater than zero".to_string(),
            ));
        }
        if self.stats_interval == 0 {
            return Err(CacheError::InvalidConfig(
                "STATS_INTERVAL must be greater than zero".to_string(),
            ));
        }
        if self.workers == 0 {
            return Err(CacheError::InvalidConfig(
                "WORKLOAD_WORKERS must be greater than zero".to_string(),
            ));
        }
        if self.entry_size == 0 {
            return Err(CacheError::InvalidConfig(
                "WORKLOAD_ENTRY_SIZE must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity_bytes: DEFAULT_CAPACITY_BYTES,
            stats_interval: 5,
            workers: 4,
            entries_per_worker: 10_000,
            entry_size: 1024,
        }
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.capacity_bytes, 256 * 1024 * 1024);
        assert_eq!(config.stats_interval, 5);
        assert_eq!(config.workers, 4);
        assert_eq!(config.entries_per_worker, 10_000);
        assert_eq!(config.entry_size, 1024);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        env::remove_var("READ_CACHE_CAPACITY_BYTES");
        env::remove_var("STATS_INTERVAL");
        env::remove_var("WORKLOAD_WORKERS");
        env::remove_var("WORKLOAD_ENTRIES_PER_WORKER");
        env::remove_var("WORKLOAD_ENTRY_SIZE");

        let config = Config::from_env();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_config_rejects_zero_capacity() {
        let config = Config {
            capacity_bytes: 0,
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(CacheError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_config_rejects_zero_workers_and_entry_size() {
        let config = Config {
            workers: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            entry_size: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
