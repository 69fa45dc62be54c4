//! API Handlers
//!
//! HTTP request handlers for each blog endpoint.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, rejection::PathRejection, OriginalUri, Path, State},
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tracing::info;

use crate::cache::{CacheClient, JsonSnapshot};
use crate::config::CachePolicy;
use crate::error::{AppError, Result};
use crate::models::{
    CreatePostRequest, DeleteResponse, DependencyStatus, HealthResponse, Post,
    RouteNotFoundResponse, UpdatePostRequest,
};
use crate::services::{PostService, StatsService};
use crate::store::PostStore;

/// Application state shared across all handlers.
///
/// Holds the injected store and cache handles and the services built on them.
#[derive(Clone)]
pub struct AppState {
    pub posts: PostService,
    pub stats: StatsService,
    pub store: Arc<dyn PostStore>,
    pub cache: Arc<dyn CacheClient>,
}

impl AppState {
    /// Wires the services over the given store and cache.
    pub fn new(
        store: Arc<dyn PostStore>,
        cache: Arc<dyn CacheClient>,
        policy: CachePolicy,
    ) -> Self {
        Self {
            posts: PostService::new(store.clone(), cache.clone(), policy.posts_ttl),
            stats: StatsService::new(store.clone(), cache.clone(), policy.stats_ttl),
            store,
            cache,
        }
    }

    /// Closes the store pool and the cache connection.
    pub async fn shutdown(&self) {
        self.store.close().await;
        self.cache.close().await;
        info!("Store and cache connections closed");
    }
}

impl IntoResponse for JsonSnapshot {
    fn into_response(self) -> Response {
        (
            [(header::CONTENT_TYPE, "application/json")],
            self.into_inner(),
        )
            .into_response()
    }
}

fn post_id(id: std::result::Result<Path<i32>, PathRejection>) -> Result<i32> {
    id.map(|Path(id)| id)
        .map_err(|_| AppError::Validation("Post id must be an integer".to_string()))
}

fn json_body<T>(payload: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(rejection.body_text())
        } else {
            AppError::Validation(rejection.body_text())
        }
    })
}

/// Handler for GET /api/posts
pub async fn list_posts_handler(State(state): State<AppState>) -> Result<JsonSnapshot> {
    state.posts.list().await
}

/// Handler for GET /api/posts/:id
pub async fn get_post_handler(
    State(state): State<AppState>,
    id: std::result::Result<Path<i32>, PathRejection>,
) -> Result<Json<Post>> {
    let post = state.posts.get(post_id(id)?).await?;
    Ok(Json(post))
}

/// Handler for POST /api/posts
pub async fn create_post_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CreatePostRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Post>)> {
    let post = state.posts.create(json_body(payload)?).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

/// Handler for PUT /api/posts/:id
pub async fn update_post_handler(
    State(state): State<AppState>,
    id: std::result::Result<Path<i32>, PathRejection>,
    payload: std::result::Result<Json<UpdatePostRequest>, JsonRejection>,
) -> Result<Json<Post>> {
    let id = post_id(id)?;
    let post = state.posts.update(id, json_body(payload)?).await?;
    Ok(Json(post))
}

/// Handler for DELETE /api/posts/:id
pub async fn delete_post_handler(
    State(state): State<AppState>,
    id: std::result::Result<Path<i32>, PathRejection>,
) -> Result<Json<DeleteResponse>> {
    let id = post_id(id)?;
    state.posts.delete(id).await?;
    Ok(Json(DeleteResponse::new(id)))
}

/// Handler for GET /api/stats
pub async fn stats_handler(State(state): State<AppState>) -> Result<JsonSnapshot> {
    state.stats.get().await
}

/// Handler for GET /health
///
/// 200 when both the store and the cache answer, 503 otherwise.
pub async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let (store, cache) = tokio::join!(state.store.ping(), state.cache.ping());
    let response = HealthResponse::from_checks(
        DependencyStatus::from_ok(store.is_ok()),
        DependencyStatus::from_ok(cache.is_ok()),
    );

    let status = if response.is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(response))
}

/// Fallback for unmatched paths and unsupported methods.
pub async fn route_not_found(
    method: Method,
    OriginalUri(uri): OriginalUri,
) -> (StatusCode, Json<RouteNotFoundResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(RouteNotFoundResponse::new(method.as_str(), uri.path())),
    )
}
