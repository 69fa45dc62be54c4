//! Blog Service - a small blog publishing API
//!
//! # Startup Sequence
//! 1. Load `.env` and initialize the tracing subscriber
//! 2. Load configuration from environment variables
//! 3. Build the post store and bootstrap its schema
//! 4. Build the cache client (Redis connects in the background)
//! 5. Serve the router until SIGINT/SIGTERM
//! 6. Close the store pool and cache connection

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use blog_service::cache::{CacheClient, MemoryCache, RedisCache};
use blog_service::config::CacheBackend;
use blog_service::store::{MemoryPostStore, PgPostStore, PostStore};
use blog_service::{create_router, spawn_sweep_task, AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "blog_service=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting blog service");

    let config = Config::from_env();
    info!(?config, "Configuration loaded");

    let store = build_store(&config).await?;
    let (cache, sweeper) = build_cache(&config)?;

    let state = AppState::new(store, cache, config.cache_policy);
    let app = create_router(state.clone(), &config);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    if let Some(handle) = sweeper {
        handle.abort();
    }
    state.shutdown().await;

    info!("Server shutdown complete");
    Ok(())
}

/// PostgreSQL when `DATABASE_URL` is set, otherwise the in-memory store.
async fn build_store(config: &Config) -> anyhow::Result<Arc<dyn PostStore>> {
    let Some(url) = config.database_url.as_deref() else {
        warn!("DATABASE_URL not set, using the in-memory post store");
        let store: Arc<dyn PostStore> = if config.seed_sample_posts {
            Arc::new(MemoryPostStore::seeded().await)
        } else {
            Arc::new(MemoryPostStore::new())
        };
        return Ok(store);
    };

    let store = PgPostStore::connect_lazy(url, config).context("invalid DATABASE_URL")?;

    // The database may still be starting; requests will retry through the pool
    match store.init_schema(config.seed_sample_posts).await {
        Ok(()) => info!("Database initialized"),
        Err(err) => error!(error = %err, "Database initialization failed"),
    }

    let store: Arc<dyn PostStore> = Arc::new(store);
    Ok(store)
}

type CacheParts = (Arc<dyn CacheClient>, Option<JoinHandle<()>>);

/// The configured cache backend, plus the sweep task for the in-memory one.
fn build_cache(config: &Config) -> anyhow::Result<CacheParts> {
    match config.cache_backend {
        CacheBackend::Redis => {
            let cache = RedisCache::connect(
                &config.cache_url(),
                config.cache_retry,
                config.cache_op_timeout,
            )
            .context("invalid Redis address")?;
            info!(url = %config.cache_url(), "Connecting to Redis in the background");
            let cache: Arc<dyn CacheClient> = Arc::new(cache);
            Ok((cache, None))
        }
        CacheBackend::Memory => {
            let cache = Arc::new(MemoryCache::new());
            let sweeper = spawn_sweep_task(cache.clone(), config.cache_sweep_interval);
            info!("Using the in-memory cache");
            let cache: Arc<dyn CacheClient> = cache;
            Ok((cache, Some(sweeper)))
        }
    }
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            error!(error = %err, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                error!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
