use crate::domain::model::Coordinate;
use crate::utils::error::Result;
use async_trait::async_trait;

/// Minimal contract of the external ordered list store.
///
/// Entries are raw bytes; decoding is the caller's job, one entry at a time.
pub trait ListStore: Send + Sync {
    /// Prepend `value` to the list stored under `key`, creating it if needed.
    fn push_front(
        &self,
        key: &str,
        value: Vec<u8>,
    ) -> impl std::future::Future<Output = Result<()>> + Send;

    /// Every entry under `key` in store order. A missing key is an empty list.
    fn range_all(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = Result<Vec<Vec<u8>>>> + Send;
}

#[async_trait]
pub trait RoadNameResolver: Send + Sync {
    async fn resolve(&self, coordinate: Coordinate) -> Result<String>;
}
