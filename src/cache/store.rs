//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with TTL expiration and a hard
//! capacity ceiling.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::cache::{CacheRecord, CacheStats};
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};

// == Overflow Policy ==
/// How the capacity ceiling is evaluated when inserting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
    /// Compare the raw entry count, expired-but-unswept records included.
    #[default]
    Strict,
    /// Run the expiry scan before comparing the entry count.
    ReclaimExpired,
}

impl FromStr for OverflowPolicy {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "reclaim" | "reclaim_expired" => Ok(Self::ReclaimExpired),
            other => Err(CacheError::InvalidConfiguration(format!(
                "unknown overflow policy '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for OverflowPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Strict => f.write_str("strict"),
            Self::ReclaimExpired => f.write_str("reclaim_expired"),
        }
    }
}

// == Cache Store ==
/// Unsynchronized cache engine with TTL expiry and a capacity ceiling.
///
/// Every read runs a full expiry scan first, so expired records are never
/// returned. Wrap it in [`Cache`](crate::cache::Cache) to share it between
/// threads and the periodic sweep.
#[derive(Debug)]
pub struct CacheStore<K, V> {
    /// Key-value storage
    entries: HashMap<K, CacheRecord<V>>,
    /// Default TTL for records inserted without one
    global_ttl: Option<Duration>,
    /// Maximum number of entries allowed
    max_entries: usize,
    overflow_policy: OverflowPolicy,
    stats: CacheStats,
}

impl<K, V> CacheStore<K, V>
where
    K: Eq + Hash,
{
    // == Constructor ==
    /// Creates an empty CacheStore.
    ///
    /// # Arguments
    /// * `global_ttl` - Default TTL for records inserted without one
    /// * `max_entries` - Maximum number of entries the cache can hold
    ///
    /// # Errors
    /// `InvalidConfiguration` if `max_entries` is zero.
    pub fn new(global_ttl: Option<Duration>, max_entries: usize) -> Result<Self> {
        if max_entries == 0 {
            return Err(CacheError::InvalidConfiguration(
                "max_entries must be greater than zero".to_string(),
            ));
        }

        let mut store = Self {
            entries: HashMap::new(),
            global_ttl,
            max_entries,
            overflow_policy: OverflowPolicy::default(),
            stats: CacheStats::new(),
        };
        store.clear();
        Ok(store)
    }

    /// Creates a CacheStore from configuration.
    pub fn from_config(config: &CacheConfig) -> Result<Self> {
        Ok(Self::new(config.default_ttl, config.max_entries)?
            .with_overflow_policy(config.overflow_policy))
    }

    /// Replaces the overflow policy.
    pub fn with_overflow_policy(mut self, policy: OverflowPolicy) -> Self {
        self.overflow_policy = policy;
        self
    }

    // == Add ==
    /// Stores a value deferring to the global TTL.
    pub fn add(&mut self, key: K, value: V) -> Result<()> {
        self.add_with_ttl(key, value, None)
    }

    /// Stores a value with an optional per-record TTL.
    ///
    /// The capacity check runs before the write and counts every stored
    /// record, so overwriting an existing key fails too once the cache is full.
    /// On failure the cache is left untouched.
    ///
    /// # Arguments
    /// * `key` - The key to store
    /// * `value` - The value to store
    /// * `ttl` - Optional TTL (defers to the global TTL if None)
    pub fn add_with_ttl(&mut self, key: K, value: V, ttl: Option<Duration>) -> Result<()> {
        if self.overflow_policy == OverflowPolicy::ReclaimExpired {
            self.clean();
        }

        if self.entries.len() >= self.max_entries {
            self.stats.record_overflow();
            return Err(CacheError::Overflow {
                max_entries: self.max_entries,
            });
        }

        self.entries.insert(key, CacheRecord::new(value, ttl));
        self.stats.set_total_entries(self.entries.len());
        Ok(())
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// Runs the expiry scan over the whole map before the lookup, so this can
    /// remove unrelated expired keys.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let removed = self.clean();
        if removed > 0 {
            trace!(removed, "Lazy cleanup removed expired entries");
        }

        match self.entries.get(key) {
            Some(record) => {
                self.stats.record_hit();
                Some(&record.value)
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Remove ==
    /// Removes an entry by key. Absent keys are ignored.
    pub fn remove<Q>(&mut self, key: &Q)
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        if self.entries.remove(key).is_some() {
            self.stats.set_total_entries(self.entries.len());
        }
    }

    // == Clear ==
    /// Drops every entry. Counters other than `total_entries` are kept.
    pub fn clear(&mut self) {
        self.entries = HashMap::new();
        self.stats.set_total_entries(0);
    }

    // == Clean ==
    /// Removes all records expired at the moment the scan starts.
    ///
    /// Returns the number of entries removed.
    pub fn clean(&mut self) -> usize {
        let now = Instant::now();
        let global_ttl = self.global_ttl;

        let before = self.entries.len();
        self.entries
            .retain(|_, record| !record.is_expired_at(global_ttl, now));

        let count = before - self.entries.len();
        if count == 0 {
            return 0;
        }

        self.stats.record_expirations(count);
        self.stats.set_total_entries(self.entries.len());
        count
    }

    // == Contains Key ==
    /// Returns true if `key` holds a live record. Does not scan or touch stats.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries
            .get(key)
            .is_some_and(|record| !record.is_expired(self.global_ttl))
    }

    // == Time To Live ==
    /// Returns the remaining lifetime of a live record.
    ///
    /// # Returns
    /// - `None` if the key is absent or expired
    /// - `Some(None)` if the record never expires
    /// - `Some(Some(remaining))` otherwise
    pub fn time_to_live<Q>(&self, key: &Q) -> Option<Option<Duration>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries
            .get(key)
            .filter(|record| !record.is_expired(self.global_ttl))
            .map(|record| record.ttl_remaining(self.global_ttl))
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    // == Length ==
    /// Returns the raw number of stored entries, expired-but-unswept included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    pub fn global_ttl(&self) -> Option<Duration> {
        self.global_ttl
    }

    pub fn overflow_policy(&self) -> OverflowPolicy {
        self.overflow_policy
    }
}
