//! Service layer: post CRUD with cache-aside reads, and derived stats.

mod posts;
mod stats;

pub use posts::PostService;
pub use stats::StatsService;
