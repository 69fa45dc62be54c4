//! Cache Module
//!
//! Key-value cache with TTL used for cache-aside reads. The `CacheClient`
//! trait is deliberately dumb (get/set/delete); read-through and
//! invalidation live in [`aside`].

mod aside;
mod entry;
mod memory;
mod redis_cache;
mod retry;


use std::fmt;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::CacheResult;

// Re-export public types
pub use aside::{cache_aside, invalidate, JsonSnapshot};
pub use entry::CacheEntry;
pub use memory::MemoryCache;
pub use redis_cache::RedisCache;
pub use retry::{retry_with_backoff, RetryPolicy};

/// The fixed set of keys the service caches under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Snapshot of the full post list
    Posts,
    /// Aggregate stats snapshot
    Stats,
}

impl CacheKey {
    pub fn as_str(self) -> &'static str {
        match self {
            CacheKey::Posts => "posts",
            CacheKey::Stats => "stats",
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Keys invalidated by every post write.
pub const WRITE_INVALIDATES: [CacheKey; 2] = [CacheKey::Posts, CacheKey::Stats];

/// Minimal key-value cache with per-entry TTL.
#[async_trait]
pub trait CacheClient: Send + Sync {
    /// The stored value, `None` on miss or expiry.
    async fn get(&self, key: &str) -> CacheResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()>;

    /// Removes `key`. Removing a missing key is not an error.
    async fn delete(&self, key: &str) -> CacheResult<()>;

    /// Round-trips the backend.
    async fn ping(&self) -> CacheResult<()>;

    /// Drops the connection; later calls fail with `Unavailable`.
    async fn close(&self);
}
