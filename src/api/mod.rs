//! API Module
//!
//! HTTP handlers and routing for the blog REST API.
//!
//! # Endpoints
//! - `GET /` - Single-page UI
//! - `GET /api/posts` - List posts (cached)
//! - `POST /api/posts` - Create a post
//! - `GET /api/posts/:id` - Fetch one post
//! - `PUT /api/posts/:id` - Update title and content
//! - `DELETE /api/posts/:id` - Delete a post
//! - `GET /api/stats` - Post and author counts (cached)
//! - `GET /health` - Store and cache reachability

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
