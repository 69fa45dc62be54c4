//! Response DTOs for the blog API
//!
//! Defines the structure of outgoing HTTP response bodies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::PostCounts;

/// Name reported by the health endpoint
pub const SERVICE_NAME: &str = "blog-service";

/// Response body for DELETE /api/posts/:id
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    /// Success message
    pub message: String,
}

impl DeleteResponse {
    /// Creates a new DeleteResponse for the given post id
    pub fn new(id: i32) -> Self {
        Self {
            message: format!("Post {} deleted successfully", id),
        }
    }
}

/// Aggregate snapshot served by GET /api/stats and cached under "stats".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSnapshot {
    /// Number of posts in the store
    pub total_posts: i64,
    /// Number of distinct authors
    pub total_authors: i64,
    /// When the counts were computed
    pub last_updated: DateTime<Utc>,
}

impl StatsSnapshot {
    /// Stamps freshly computed counts with the current time
    pub fn fresh(counts: PostCounts) -> Self {
        Self {
            total_posts: counts.total_posts,
            total_authors: counts.total_authors,
            last_updated: Utc::now(),
        }
    }
}

/// Reachability of a single dependency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyStatus {
    Connected,
    Disconnected,
}

impl DependencyStatus {
    pub fn from_ok(ok: bool) -> Self {
        if ok {
            DependencyStatus::Connected
        } else {
            DependencyStatus::Disconnected
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// "healthy" or "unhealthy"
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
    /// Service name
    pub service: String,
    /// Store reachability
    pub database: DependencyStatus,
    /// Cache reachability
    pub cache: DependencyStatus,
    /// Why the check failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HealthResponse {
    /// Builds a response from the two dependency checks
    pub fn from_checks(database: DependencyStatus, cache: DependencyStatus) -> Self {
        let healthy =
            database == DependencyStatus::Connected && cache == DependencyStatus::Connected;
        let error = (!healthy).then(|| {
            let mut down = Vec::new();
            if database == DependencyStatus::Disconnected {
                down.push("database");
            }
            if cache == DependencyStatus::Disconnected {
                down.push("cache");
            }
            format!("Unreachable: {}", down.join(", "))
        });

        Self {
            status: if healthy { "healthy" } else { "unhealthy" }.to_string(),
            timestamp: Utc::now().to_rfc3339(),
            service: SERVICE_NAME.to_string(),
            database,
            cache,
            error,
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.error.is_none()
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Body returned for unmatched routes
#[derive(Debug, Clone, Serialize)]
pub struct RouteNotFoundResponse {
    pub error: String,
    pub path: String,
    pub method: String,
}

impl RouteNotFoundResponse {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            error: "Endpoint not found".to_string(),
            path: path.into(),
            method: method.into(),
        }
    }
}
