//! Blog Service - a small blog publishing API
//!
//! Posts live in PostgreSQL; the post list and aggregate stats are served
//! cache-aside from Redis and invalidated on every write.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod store;
pub mod tasks;
pub mod ui;

pub use api::{create_router, AppState};
pub use config::Config;
pub use tasks::spawn_sweep_task;
