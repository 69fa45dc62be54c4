//! Domain records and request/response bodies for the blog API
//!
//! `post` holds the stored record, `requests` the validated inbound schemas,
//! `responses` everything serialized back to clients.

pub mod post;
pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use post::{NewPost, Post, PostChanges, PostCounts, MAX_AUTHOR_LENGTH, MAX_TITLE_LENGTH};
pub use requests::{CreatePostRequest, UpdatePostRequest};
pub use responses::{
    DeleteResponse, DependencyStatus, ErrorResponse, HealthResponse, RouteNotFoundResponse,
    StatsSnapshot,
};
