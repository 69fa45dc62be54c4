//! Store Module
//!
//! The source of truth for posts. `PostStore` is the seam the services depend
//! on; `PgPostStore` talks to PostgreSQL and `MemoryPostStore` keeps rows in
//! process for tests and database-less runs.

mod memory;
mod postgres;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{NewPost, Post, PostChanges, PostCounts};

pub use memory::MemoryPostStore;
pub use postgres::PgPostStore;

/// Parameterized access to the posts table.
#[async_trait]
pub trait PostStore: Send + Sync {
    /// All posts, newest first.
    async fn list_posts(&self) -> Result<Vec<Post>>;

    /// A single post, `None` when no row matches.
    async fn find_post(&self, id: i32) -> Result<Option<Post>>;

    /// Inserts a post; the store assigns id and timestamps.
    async fn insert_post(&self, post: &NewPost) -> Result<Post>;

    /// Rewrites title/content and refreshes `updated_at`. `None` when no row matched.
    async fn update_post(&self, id: i32, changes: &PostChanges) -> Result<Option<Post>>;

    /// Removes a post. `false` when no row matched.
    async fn delete_post(&self, id: i32) -> Result<bool>;

    /// Total posts and distinct authors.
    async fn count_posts(&self) -> Result<PostCounts>;

    /// Round-trips the backend.
    async fn ping(&self) -> Result<()>;

    /// Releases pooled connections.
    async fn close(&self);
}

/// Sample rows inserted into an empty table on first start.
pub(crate) const SAMPLE_POSTS: [(&str, &str, &str); 3] = [
    (
        "Welcome to the blog",
        "This blog runs as a set of small services: a web UI, a JSON API, a relational store and a cache. Each has one job.",
        "Admin",
    ),
    (
        "Separation of concerns",
        "The UI renders, the API validates and orchestrates, the database persists and the cache absorbs repeated reads.",
        "Architect",
    ),
    (
        "Loose coupling",
        "Services talk through well-defined HTTP and wire protocols, so each one can change without breaking the others.",
        "Developer",
    ),
];
