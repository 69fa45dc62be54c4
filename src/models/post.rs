//! Post record as stored and returned by the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Maximum title length in characters (column is `VARCHAR(255)`)
pub const MAX_TITLE_LENGTH: usize = 255;

/// Maximum author length in characters (column is `VARCHAR(100)`)
pub const MAX_AUTHOR_LENGTH: usize = 100;

/// A blog post row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Post {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub author: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated fields for an insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub author: String,
}

/// Validated fields for an update. Author is immutable after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostChanges {
    pub title: String,
    pub content: String,
}

/// Aggregates computed by the store for the stats snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PostCounts {
    pub total_posts: i64,
    pub total_authors: i64,
}
