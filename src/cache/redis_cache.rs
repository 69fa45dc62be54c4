//! Redis cache backend.
//!
//! The connection is established in the background so the service starts
//! (and serves from the store) while Redis is still coming up. Until a
//! connection exists, and after the retry budget is spent, every command
//! fails fast with [`CacheError::Unavailable`].

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client, RedisResult};
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{info, warn};

use super::{retry_with_backoff, CacheClient, RetryPolicy};
use crate::error::{CacheError, CacheResult};

/// Bound on a single connection attempt
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// `ConnectionManager` retries internally unless told not to; the only
/// reconnect schedule is the caller's [`RetryPolicy`].
const MANAGER_BACKOFF_BASE: u64 = 2;
const MANAGER_BACKOFF_FACTOR: u64 = 100;
const MANAGER_RETRIES: usize = 0;

struct Inner {
    conn: RwLock<Option<ConnectionManager>>,
    connector: Mutex<Option<JoinHandle<()>>>,
    op_timeout: Duration,
}

/// Redis-backed [`CacheClient`].
#[derive(Clone)]
pub struct RedisCache {
    inner: Arc<Inner>,
}

impl RedisCache {
    /// Parses `url` and starts connecting in the background under `retry`.
    ///
    /// Returns immediately; only a malformed URL is an error.
    pub fn connect(url: &str, retry: RetryPolicy, op_timeout: Duration) -> CacheResult<Self> {
        let client = Client::open(url)?;
        let cache = Self {
            inner: Arc::new(Inner {
                conn: RwLock::new(None),
                connector: Mutex::new(None),
                op_timeout,
            }),
        };

        let inner = cache.inner.clone();
        let handle = tokio::spawn(async move {
            let manager = retry_with_backoff(&retry, "Redis connection", |_| {
                let client = client.clone();
                async move {
                    let connect = ConnectionManager::new_with_backoff(
                        client,
                        MANAGER_BACKOFF_BASE,
                        MANAGER_BACKOFF_FACTOR,
                        MANAGER_RETRIES,
                    );
                    match timeout(CONNECT_TIMEOUT, connect).await {
                        Ok(result) => result.map_err(CacheError::from),
                        Err(_) => Err(CacheError::Timeout),
                    }
                }
            })
            .await;

            match manager {
                Some(manager) => {
                    *inner.conn.write().await = Some(manager);
                    info!("Redis connected");
                }
                None => warn!("Giving up on Redis, cache reads will miss"),
            }
        });

        // The lock is fresh and uncontended here
        if let Ok(mut connector) = cache.inner.connector.try_lock() {
            *connector = Some(handle);
        }

        Ok(cache)
    }

    #[cfg(test)]
    async fn is_connected(&self) -> bool {
        self.inner.conn.read().await.is_some()
    }

    async fn connection(&self) -> CacheResult<ConnectionManager> {
        self.inner
            .conn
            .read()
            .await
            .clone()
            .ok_or(CacheError::Unavailable)
    }

    async fn run<T, Fut>(&self, command: Fut) -> CacheResult<T>
    where
        Fut: Future<Output = RedisResult<T>>,
    {
        match timeout(self.inner.op_timeout, command).await {
            Ok(result) => result.map_err(CacheError::from),
            Err(_) => Err(CacheError::Timeout),
        }
    }
}

#[async_trait]
impl CacheClient for RedisCache {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let mut conn = self.connection().await?;
        self.run(async move { conn.get::<_, Option<String>>(key).await })
            .await
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()> {
        let mut conn = self.connection().await?;
        // SETEX rejects a zero expiry
        let seconds = ttl.as_secs().max(1);
        self.run(async move { conn.set_ex::<_, _, ()>(key, value, seconds).await })
            .await
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        let mut conn = self.connection().await?;
        self.run(async move { conn.del::<_, ()>(key).await }).await
    }

    async fn ping(&self) -> CacheResult<()> {
        let mut conn = self.connection().await?;
        self.run(async move {
            redis::cmd("PING")
                .query_async::<_, String>(&mut conn)
                .await
        })
        .await
        .map(|_| ())
    }

    async fn close(&self) {
        if let Some(handle) = self.inner.connector.lock().await.take() {
            handle.abort();
        }
        if self.inner.conn.write().await.take().is_some() {
            info!("Redis connection closed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio::net::TcpListener;
    use tokio_test::assert_err;

    fn unreachable_cache() -> RedisCache {
        let retry = RetryPolicy {
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(1),
            max_attempts: 1,
            max_total: Duration::from_millis(10),
        };
        // Port 1 is reserved and refuses connections
        RedisCache::connect("redis://127.0.0.1:1", retry, Duration::from_millis(50)).unwrap()
    }

    #[tokio::test]
    async fn test_malformed_url_is_rejected() {
        let result = RedisCache::connect(
            "not a url",
            RetryPolicy::default(),
            Duration::from_millis(50),
        );
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_unreachable_cache_degrades_to_unavailable() {
        let cache = unreachable_cache();

        assert!(matches!(cache.get("posts").await, Err(CacheError::Unavailable)));
        assert_err!(cache.set("posts", "[]", Duration::from_secs(1)).await);
        assert_err!(cache.delete("posts").await);
        assert_err!(cache.ping().await);
    }

    #[tokio::test]
    async fn test_close_before_connect() {
        let cache = unreachable_cache();
        cache.close().await;

        assert!(!cache.is_connected().await);
        assert!(matches!(cache.get("stats").await, Err(CacheError::Unavailable)));
    }

    #[tokio::test]
    async fn test_connect_makes_one_attempt_per_retry_step() {
        // Accepts and hangs up, so every handshake fails
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let accepts = Arc::new(AtomicU32::new(0));
        let counter = accepts.clone();
        let server = tokio::spawn(async move {
            while let Ok((socket, _)) = listener.accept().await {
                counter.fetch_add(1, Ordering::SeqCst);
                drop(socket);
            }
        });

        let retry = RetryPolicy {
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(1),
            max_attempts: 1,
            max_total: Duration::from_secs(5),
        };
        let url = format!("redis://{}", addr);
        let cache = RedisCache::connect(&url, retry, Duration::from_millis(50)).unwrap();

        tokio::time::sleep(Duration::from_millis(800)).await;

        assert_eq!(accepts.load(Ordering::SeqCst), 1);
        cache.close().await;
        server.abort();
    }
}
