pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use adapters::{memory_store::MemoryListStore, redis_store::RedisListStore};
pub use config::ServiceConfig;
pub use core::{engine::ProximityEngine, handler::RequestHandler, point_store::PointStore};
pub use utils::error::{ProximityError, Result};
