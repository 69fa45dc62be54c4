//! Stats Service
//!
//! Aggregate counts over the post store, cached under [`CacheKey::Stats`].

use std::sync::Arc;
use std::time::Duration;

use crate::cache::{cache_aside, CacheClient, CacheKey, JsonSnapshot};
use crate::error::Result;
use crate::models::StatsSnapshot;
use crate::store::PostStore;

#[derive(Clone)]
pub struct StatsService {
    store: Arc<dyn PostStore>,
    cache: Arc<dyn CacheClient>,
    ttl: Duration,
}

impl StatsService {
    pub fn new(store: Arc<dyn PostStore>, cache: Arc<dyn CacheClient>, ttl: Duration) -> Self {
        Self { store, cache, ttl }
    }

    /// Total posts and distinct authors, stamped with when they were computed.
    pub async fn get(&self) -> Result<JsonSnapshot> {
        let store = self.store.clone();
        cache_aside(self.cache.as_ref(), CacheKey::Stats, self.ttl, || async move {
            let counts = store.count_posts().await?;
            Ok(StatsSnapshot::fresh(counts))
        })
        .await
    }
}
