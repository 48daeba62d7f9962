//! Shared Cache Handle
//!
//! Thread-safe wrapper serializing every operation on a [`CacheStore`]
//! behind a single mutex.

use std::borrow::Borrow;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::cache::{CacheStats, CacheStore};
use crate::config::CacheConfig;
use crate::error::Result;

// == Cache ==
/// Cloneable, thread-safe cache handle.
///
/// Clones share the same underlying store. Foreground calls and the periodic
/// sweep all take the same lock, so a lookup and its preceding expiry scan run
/// as one step.
#[derive(Debug)]
pub struct Cache<K, V> {
    inner: Arc<Mutex<CacheStore<K, V>>>,
}

impl<K, V> Clone for Cache<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V> Cache<K, V>
where
    K: Eq + Hash,
{
    /// Creates an empty cache.
    ///
    /// # Errors
    /// `InvalidConfiguration` if `max_entries` is zero.
    pub fn new(global_ttl: Option<Duration>, max_entries: usize) -> Result<Self> {
        CacheStore::new(global_ttl, max_entries).map(Self::from_store)
    }

    /// Creates an empty cache from configuration.
    pub fn from_config(config: &CacheConfig) -> Result<Self> {
        CacheStore::from_config(config).map(Self::from_store)
    }

    /// Wraps an existing store.
    pub fn from_store(store: CacheStore<K, V>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    /// Returns a clone of the live value stored under `key`.
    ///
    /// Expired entries anywhere in the cache are removed first.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        self.inner.lock().get(key).cloned()
    }

    /// Stores a value deferring to the global TTL.
    pub fn add(&self, key: K, value: V) -> Result<()> {
        self.inner.lock().add(key, value)
    }

    /// Stores a value with an optional per-entry TTL.
    pub fn add_with_ttl(&self, key: K, value: V, ttl: Option<Duration>) -> Result<()> {
        self.inner.lock().add_with_ttl(key, value, ttl)
    }

    pub fn remove<Q>(&self, key: &Q)
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.lock().remove(key)
    }

    pub fn clear(&self) {
        self.inner.lock().clear()
    }

    /// Runs the expiry scan, returning the number of entries removed.
    pub fn clean(&self) -> usize {
        self.inner.lock().clean()
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.lock().contains_key(key)
    }

    /// Remaining lifetime of a live entry, see [`CacheStore::time_to_live`].
    pub fn time_to_live<Q>(&self, key: &Q) -> Option<Option<Duration>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.lock().time_to_live(key)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        self.inner.lock().stats()
    }

    pub fn max_entries(&self) -> usize {
        self.inner.lock().max_entries()
    }

    pub fn global_ttl(&self) -> Option<Duration> {
        self.inner.lock().global_ttl()
    }
}
