//! Configuration Module
//!
//! Handles loading and managing cache configuration from environment variables.

use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cache::OverflowPolicy;

/// Reference period of the periodic sweep.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(2);

/// Default capacity of a cache built from configuration.
pub const DEFAULT_MAX_ENTRIES: usize = 1000;

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of entries the cache can hold
    pub max_entries: usize,
    /// Global TTL for entries inserted without one, None = never expire
    pub default_ttl: Option<Duration>,
    /// Period of the background sweep
    pub sweep_interval: Duration,
    /// How capacity is evaluated on insert
    pub overflow_policy: OverflowPolicy,
}

impl CacheConfig {
    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_ENTRIES` - Maximum cache entries, must be positive (default: 1000)
    /// - `DEFAULT_TTL_MS` - Global TTL in milliseconds, 0 = none (default: none)
    /// - `SWEEP_INTERVAL_MS` - Sweep period in milliseconds (default: 2000)
    /// - `OVERFLOW_POLICY` - `strict` or `reclaim` (default: strict)
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a config from an arbitrary variable lookup.
    ///
    /// Missing, unparsable or zero values fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            max_entries: lookup("MAX_ENTRIES")
                .and_then(|v| v.trim().parse::<usize>().ok())
                .filter(|n| *n > 0)
                .unwrap_or(defaults.max_entries),
            default_ttl: match lookup("DEFAULT_TTL_MS").and_then(|v| v.trim().parse::<u64>().ok()) {
                Some(0) | None => defaults.default_ttl,
                Some(ms) => Some(Duration::from_millis(ms)),
            },
            sweep_interval: lookup("SWEEP_INTERVAL_MS")
                .and_then(|v| v.trim().parse::<u64>().ok())
                .filter(|ms| *ms > 0)
                .map(Duration::from_millis)
                .unwrap_or(defaults.sweep_interval),
            overflow_policy: lookup("OVERFLOW_POLICY")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.overflow_policy),
        }
    }

    /// Sets the global TTL.
    pub fn with_default_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.default_ttl = ttl;
        self
    }

    /// Sets the capacity.
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
            default_ttl: None,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
            overflow_policy: OverflowPolicy::Strict,
        }
    }
}
