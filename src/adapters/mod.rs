// Adapters layer: concrete implementations for external systems (list stores, reverse geocoding).

pub mod memory_store;
pub mod nominatim;
pub mod redis_store;
