//! Cache Entry Module
//!
//! A single value held by the in-memory cache, with its expiry deadline.

use std::time::{Duration, Instant};

use crate::config::MAX_CACHE_TTL;

// == Cache Entry ==
/// A stored value and the instant it stops being served.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored value
    pub value: String,
    /// Deadline after which the entry is a miss
    pub expires_at: Instant,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates an entry that lives for `ttl` from now, at most [`MAX_CACHE_TTL`].
    pub fn new(value: String, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: Instant::now() + ttl.min(MAX_CACHE_TTL),
        }
    }

    // == Is Expired ==
    /// An entry is expired once the current time reaches its deadline, so a
    /// zero TTL is never served.
    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }

    /// Remaining lifetime, zero once expired.
    #[cfg(test)]
    fn ttl_remaining(&self) -> Duration {
        self.expires_at.saturating_duration_since(Instant::now())
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn test_entry_creation() {
        let entry = CacheEntry::new("[]".to_string(), Duration::from_secs(60));

        assert_eq!(entry.value, "[]");
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_entry_expiration() {
        let entry = CacheEntry::new("[]".to_string(), Duration::from_millis(50));
        assert!(!entry.is_expired());

        sleep(Duration::from_millis(80));

        assert!(entry.is_expired());
        assert_eq!(entry.ttl_remaining(), Duration::ZERO);
    }

    #[test]
    fn test_ttl_remaining() {
        let entry = CacheEntry::new("[]".to_string(), Duration::from_secs(10));

        let remaining = entry.ttl_remaining();
        assert!(remaining <= Duration::from_secs(10));
        assert!(remaining >= Duration::from_secs(9));
    }

    #[test]
    fn test_huge_ttl_is_clamped() {
        let entry = CacheEntry::new("[]".to_string(), Duration::MAX);

        assert!(!entry.is_expired());
        assert!(entry.ttl_remaining() <= MAX_CACHE_TTL);
    }

    #[test]
    fn test_zero_ttl_is_expired() {
        let entry = CacheEntry::new("[]".to_string(), Duration::ZERO);
        assert!(entry.is_expired(), "Entry should be expired at boundary");
    }
}
