pub mod engine;
pub mod geo;
pub mod handler;
pub mod point_store;
pub mod request;

pub use crate::domain::model::{ActionResponse, Coordinate, RoadPoint};
pub use crate::domain::ports::{ListStore, RoadNameResolver};
pub use crate::utils::error::Result;
