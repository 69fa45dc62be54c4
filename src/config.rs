//! Configuration Module
//!
//! Handles loading and managing service configuration from environment variables.

use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::RetryPolicy;

/// Deployment environment, selects the CORS policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Environment::Production,
            _ => Environment::Development,
        }
    }
}

/// Which cache backend to construct at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheBackend {
    Redis,
    Memory,
}

impl CacheBackend {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" => CacheBackend::Memory,
            _ => CacheBackend::Redis,
        }
    }
}

/// Longest TTL a cached snapshot may carry.
pub const MAX_CACHE_TTL: Duration = Duration::from_secs(60 * 60 * 24 * 365);

/// Default cap on request bodies, 10 MiB.
pub const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Time-to-live applied to each cached snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    /// TTL of the "posts" list snapshot
    pub posts_ttl: Duration,
    /// TTL of the "stats" aggregate snapshot
    pub stats_ttl: Duration,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            posts_ttl: Duration::from_secs(300),
            stats_ttl: Duration::from_secs(120),
        }
    }
}

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Clone)]
pub struct Config {
    /// Deployment environment
    pub environment: Environment,
    /// HTTP server port
    pub server_port: u16,
    /// PostgreSQL connection string, `None` runs against the in-memory store
    pub database_url: Option<String>,
    /// Maximum pooled store connections
    pub db_max_connections: u32,
    /// How long a request waits for a pooled connection
    pub db_acquire_timeout: Duration,
    /// Idle pooled connections are closed after this long
    pub db_idle_timeout: Duration,
    /// Insert sample posts into an empty table at startup
    pub seed_sample_posts: bool,
    /// Cache backend selection
    pub cache_backend: CacheBackend,
    /// Redis host
    pub cache_host: String,
    /// Redis port
    pub cache_port: u16,
    /// Upper bound on a single cache command
    pub cache_op_timeout: Duration,
    /// Connection retry policy for the cache
    pub cache_retry: RetryPolicy,
    /// Expiry sweep interval for the in-memory cache
    pub cache_sweep_interval: Duration,
    /// TTLs for cached snapshots
    pub cache_policy: CachePolicy,
    /// Allowed CORS origins in production
    pub cors_allowed_origins: Vec<String>,
    /// Largest accepted request body in bytes
    pub max_body_bytes: usize,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `APP_ENV` - `production` or `development` (default: development)
    /// - `SERVER_PORT` / `PORT` - HTTP server port (default: 8000)
    /// - `DATABASE_URL` - PostgreSQL URL (default: unset, in-memory store)
    /// - `CACHE_BACKEND` - `redis` or `memory` (default: redis)
    /// - `REDIS_HOST` / `REDIS_PORT` - cache address (default: redis:6379)
    /// - `POSTS_CACHE_TTL_SECS` / `STATS_CACHE_TTL_SECS` - snapshot TTLs (default: 300 / 120)
    /// - `CORS_ALLOWED_ORIGINS` - comma-separated origins, `*` is ignored (default: http://localhost:3000)
    /// - `MAX_BODY_BYTES` - request body cap (default: 10 MiB)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let retry = defaults.cache_retry;

        Self {
            environment: env::var("APP_ENV")
                .map(|v| Environment::parse(&v))
                .unwrap_or(defaults.environment),
            server_port: env_or("SERVER_PORT", env_or("PORT", defaults.server_port)),
            database_url: env::var("DATABASE_URL")
                .ok()
                .filter(|v| !v.trim().is_empty()),
            db_max_connections: env_or("DB_MAX_CONNECTIONS", defaults.db_max_connections),
            db_acquire_timeout: Duration::from_millis(env_or("DB_ACQUIRE_TIMEOUT_MS", 2000)),
            db_idle_timeout: Duration::from_secs(env_or("DB_IDLE_TIMEOUT_SECS", 30)),
            seed_sample_posts: env_or("SEED_SAMPLE_POSTS", defaults.seed_sample_posts),
            cache_backend: env::var("CACHE_BACKEND")
                .map(|v| CacheBackend::parse(&v))
                .unwrap_or(defaults.cache_backend),
            cache_host: env::var("REDIS_HOST").unwrap_or(defaults.cache_host),
            cache_port: env_or("REDIS_PORT", defaults.cache_port),
            cache_op_timeout: Duration::from_millis(env_or("CACHE_OP_TIMEOUT_MS", 500)),
            cache_retry: RetryPolicy {
                base_delay: Duration::from_millis(env_or("CACHE_RETRY_BASE_MS", 100)),
                max_delay: Duration::from_millis(env_or("CACHE_RETRY_MAX_DELAY_MS", 3000)),
                max_attempts: env_or("CACHE_RETRY_MAX_ATTEMPTS", retry.max_attempts),
                max_total: Duration::from_secs(env_or("CACHE_RETRY_MAX_TOTAL_SECS", 3600)),
            },
            cache_sweep_interval: Duration::from_secs(env_or("CACHE_SWEEP_INTERVAL_SECS", 1)),
            cache_policy: CachePolicy {
                posts_ttl: ttl_secs(env_or("POSTS_CACHE_TTL_SECS", 300)),
                stats_ttl: ttl_secs(env_or("STATS_CACHE_TTL_SECS", 120)),
            },
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .map(|v| parse_origins(&v))
                .unwrap_or(defaults.cors_allowed_origins),
            max_body_bytes: env_or("MAX_BODY_BYTES", defaults.max_body_bytes),
        }
    }

    /// Redis connection URL built from host and port.
    pub fn cache_url(&self) -> String {
        format!("redis://{}:{}", self.cache_host, self.cache_port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: Environment::Development,
            server_port: 8000,
            database_url: None,
            db_max_connections: 20,
            db_acquire_timeout: Duration::from_millis(2000),
            db_idle_timeout: Duration::from_secs(30),
            seed_sample_posts: true,
            cache_backend: CacheBackend::Redis,
            cache_host: "redis".to_string(),
            cache_port: 6379,
            cache_op_timeout: Duration::from_millis(500),
            cache_retry: RetryPolicy::default(),
            cache_sweep_interval: Duration::from_secs(1),
            cache_policy: CachePolicy::default(),
            cors_allowed_origins: vec!["http://localhost:3000".to_string()],
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("environment", &self.environment)
            .field("server_port", &self.server_port)
            .field(
                "database_url",
                &self.database_url.as_ref().map(|_| "[REDACTED]"),
            )
            .field("db_max_connections", &self.db_max_connections)
            .field("cache_backend", &self.cache_backend)
            .field("cache_host", &self.cache_host)
            .field("cache_port", &self.cache_port)
            .field("cache_policy", &self.cache_policy)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("max_body_bytes", &self.max_body_bytes)
            .finish_non_exhaustive()
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn ttl_secs(secs: u64) -> Duration {
    Duration::from_secs(secs).min(MAX_CACHE_TTL)
}

// A wildcard cannot be combined with credentials, so only explicit origins are kept
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty() && *origin != "*")
        .map(String::from)
        .collect()
}
