//! API Routes
//!
//! Configures the Axum router with all blog endpoints.

use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method, Request},
    routing::get,
    Router,
};
use chrono::Utc;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, Span};

use super::handlers::{
    create_post_handler, delete_post_handler, get_post_handler, health_handler,
    list_posts_handler, route_not_found, stats_handler, update_post_handler, AppState,
};
use crate::config::{Config, Environment};
use crate::ui;

/// Creates the main router with all endpoints configured.
///
/// # Middleware
/// - CORS: fixed origin list in production, request origin mirrored elsewhere
/// - Tracing: one log line per request with timestamp, method and path
/// - Body limit: `config.max_body_bytes`, larger bodies get 413
///
/// Unsupported methods on known paths get the same structured 404 as
/// unknown paths.
pub fn create_router(state: AppState, config: &Config) -> Router {
    let request_log = TraceLayer::new_for_http()
        .on_request(|request: &Request<Body>, _span: &Span| {
            info!(
                timestamp = %Utc::now().to_rfc3339(),
                method = %request.method(),
                path = %request.uri().path(),
                "request"
            );
        })
        .on_response(())
        .on_failure(());

    Router::new()
        .route("/", get(ui::index).fallback(route_not_found))
        .route(
            "/api/posts",
            get(list_posts_handler)
                .post(create_post_handler)
                .fallback(route_not_found),
        )
        .route(
            "/api/posts/:id",
            get(get_post_handler)
                .put(update_post_handler)
                .delete(delete_post_handler)
                .fallback(route_not_found),
        )
        .route("/api/stats", get(stats_handler).fallback(route_not_found))
        .route("/health", get(health_handler).fallback(route_not_found))
        .fallback(route_not_found)
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(cors_layer(config))
        .layer(request_log)
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    let origins = match config.environment {
        Environment::Production => AllowOrigin::list(
            config
                .cors_allowed_origins
                .iter()
                .filter_map(|origin| origin.parse::<HeaderValue>().ok()),
        ),
        Environment::Development => AllowOrigin::mirror_request(),
    };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
}
