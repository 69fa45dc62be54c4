//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Cache sweep: drops expired entries from the in-memory cache backend

mod sweep;

pub use sweep::spawn_sweep_task;
