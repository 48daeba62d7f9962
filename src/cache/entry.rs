//! Cache Record Module
//!
//! Defines the structure for individual cache records and the single expiry
//! predicate shared by lazy cleanup and the periodic sweep.

use std::time::{Duration, Instant};

// == Cache Record ==
/// Represents a single cache record with value and expiry metadata.
#[derive(Debug, Clone)]
pub struct CacheRecord<V> {
    /// The stored value
    pub value: V,
    /// Insertion instant (monotonic clock)
    pub created_at: Instant,
    /// Per-record TTL, None = defer to the engine's global TTL
    pub ttl: Option<Duration>,
}

impl<V> CacheRecord<V> {
    // == Constructor ==
    /// Creates a new record stamped with the current instant.
    ///
    /// # Arguments
    /// * `value` - The value to store
    /// * `ttl` - Optional per-record TTL overriding the global one
    pub fn new(value: V, ttl: Option<Duration>) -> Self {
        Self {
            value,
            created_at: Instant::now(),
            ttl,
        }
    }

    // == Effective TTL ==
    /// Resolves the TTL applied to this record against the engine default.
    pub fn effective_ttl(&self, global_ttl: Option<Duration>) -> Option<Duration> {
        effective_ttl(self.ttl, global_ttl)
    }

    // == Expires At ==
    /// Returns the instant at which this record expires, or None if it never does.
    ///
    /// A TTL too large to be represented on the monotonic clock is treated as
    /// "never expires".
    pub fn expires_at(&self, global_ttl: Option<Duration>) -> Option<Instant> {
        self.effective_ttl(global_ttl)
            .and_then(|ttl| self.created_at.checked_add(ttl))
    }

    // == Is Expired At ==
    /// Checks whether the record is expired at `now`.
    ///
    /// Boundary condition: a record is expired once `now` reaches
    /// `created_at + effective_ttl`, so a zero TTL expires immediately.
    pub fn is_expired_at(&self, global_ttl: Option<Duration>, now: Instant) -> bool {
        match self.expires_at(global_ttl) {
            Some(expires) => now >= expires,
            None => false,
        }
    }

    // == Is Expired ==
    /// Checks whether the record is expired right now.
    pub fn is_expired(&self, global_ttl: Option<Duration>) -> bool {
        self.is_expired_at(global_ttl, Instant::now())
    }

    // == Time To Live ==
    /// Returns the remaining lifetime, or None if the record never expires.
    ///
    /// # Returns
    /// - `Some(Duration::ZERO)` if the record has expired
    /// - `Some(remaining)` if the record has a TTL and hasn't expired
    /// - `None` if the record never expires
    pub fn ttl_remaining(&self, global_ttl: Option<Duration>) -> Option<Duration> {
        self.expires_at(global_ttl)
            .map(|expires| expires.saturating_duration_since(Instant::now()))
    }
}

// == Utility Functions ==
/// Two-level TTL fallback: record TTL, else global TTL, else never expires.
pub fn effective_ttl(record_ttl: Option<Duration>, global_ttl: Option<Duration>) -> Option<Duration> {
    record_ttl.or(global_ttl)
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn test_record_creation_no_ttl() {
        let record = CacheRecord::new("test_value".to_string(), None);

        assert_eq!(record.value, "test_value");
        assert!(record.ttl.is_none());
        assert!(!record.is_expired(None));
    }

    #[test]
    fn test_record_creation_with_ttl() {
        let record = CacheRecord::new("test_value", Some(Duration::from_secs(60)));

        assert_eq!(record.ttl, Some(Duration::from_secs(60)));
        assert!(!record.is_expired(None));
    }

    #[test]
    fn test_effective_ttl_fallback() {
        let short = Duration::from_millis(10);
        let long = Duration::from_millis(500);

        assert_eq!(effective_ttl(Some(long), Some(short)), Some(long));
        assert_eq!(effective_ttl(None, Some(short)), Some(short));
        assert_eq!(effective_ttl(Some(long), None), Some(long));
        assert_eq!(effective_ttl(None, None), None);
    }

    #[test]
    fn test_global_ttl_applies_without_record_ttl() {
        let record = CacheRecord::new(1u32, None);
        let later = record.created_at + Duration::from_millis(20);

        assert!(!record.is_expired_at(None, later));
        assert!(record.is_expired_at(Some(Duration::from_millis(10)), later));
    }

    #[test]
    fn test_record_ttl_overrides_global() {
        let record = CacheRecord::new(1u32, Some(Duration::from_millis(500)));
        let later = record.created_at + Duration::from_millis(100);

        assert!(!record.is_expired_at(Some(Duration::from_millis(10)), later));
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let record = CacheRecord::new("v", Some(Duration::from_millis(50)));
        let boundary = record.created_at + Duration::from_millis(50);
        let just_before = record.created_at + Duration::from_millis(49);

        assert!(record.is_expired_at(None, boundary), "Record should be expired at boundary");
        assert!(!record.is_expired_at(None, just_before));
    }

    #[test]
    fn test_zero_ttl_expires_immediately() {
        let record = CacheRecord::new("v", Some(Duration::ZERO));
        assert!(record.is_expired(None));
    }

    #[test]
    fn test_unrepresentable_ttl_never_expires() {
        let record = CacheRecord::new("v", Some(Duration::MAX));

        assert!(record.expires_at(None).is_none());
        assert!(!record.is_expired(None));
    }

    #[test]
    fn test_record_expiration() {
        let record = CacheRecord::new("v", Some(Duration::from_millis(20)));

        assert!(!record.is_expired(None));
        sleep(Duration::from_millis(40));
        assert!(record.is_expired(None));
    }

    #[test]
    fn test_ttl_remaining() {
        let record = CacheRecord::new("v", Some(Duration::from_secs(10)));

        let remaining = record.ttl_remaining(None).unwrap();
        assert!(remaining <= Duration::from_secs(10));
        assert!(remaining >= Duration::from_secs(9));
        assert!(CacheRecord::new("v", None).ttl_remaining(None).is_none());
    }

    #[test]
    fn test_ttl_remaining_expired() {
        let record = CacheRecord::new("v", Some(Duration::ZERO));
        assert_eq!(record.ttl_remaining(None), Some(Duration::ZERO));
    }
}
