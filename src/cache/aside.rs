//! Cache-aside helpers shared by the post list and stats reads.

use std::future::Future;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, warn};

use super::{CacheClient, CacheKey};
use crate::error::{AppError, CacheError, Result};

/// Serialized JSON exactly as stored in (or about to be stored in) the cache.
///
/// Served verbatim so a cache hit is byte-identical to the miss that filled it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonSnapshot(pub String);

impl JsonSnapshot {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Returns the cached value under `key`, or runs `fetch`, caches its
/// serialized result for `ttl` and returns that.
///
/// Cache failures are logged and treated as misses; only `fetch` errors and
/// serialization failures reach the caller.
pub async fn cache_aside<T, F, Fut>(
    cache: &dyn CacheClient,
    key: CacheKey,
    ttl: Duration,
    fetch: F,
) -> Result<JsonSnapshot>
where
    T: Serialize,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    match cache.get(key.as_str()).await {
        Ok(Some(json)) => {
            debug!(%key, "cache hit");
            return Ok(JsonSnapshot(json));
        }
        Ok(None) => debug!(%key, "cache miss"),
        Err(err) => log_cache_failure(key, "read", &err),
    }

    let value = fetch().await?;
    let json = serde_json::to_string(&value)
        .map_err(|e| AppError::Internal(format!("failed to serialize {}: {}", key, e)))?;

    if let Err(err) = cache.set(key.as_str(), &json, ttl).await {
        log_cache_failure(key, "write", &err);
    }

    Ok(JsonSnapshot(json))
}

/// Best-effort removal of `keys`. Failures are logged, never returned.
pub async fn invalidate(cache: &dyn CacheClient, keys: &[CacheKey]) {
    for &key in keys {
        match cache.delete(key.as_str()).await {
            Ok(()) => debug!(%key, "cache invalidated"),
            Err(err) => log_cache_failure(key, "invalidate", &err),
        }
    }
}

fn log_cache_failure(key: CacheKey, op: &str, err: &CacheError) {
    match err {
        CacheError::Unavailable => debug!(%key, op, "cache unavailable, skipping"),
        other => warn!(%key, op, error = %other, "cache operation failed"),
    }
}
