use crate::domain::model::RoadPoint;
use crate::domain::ports::ListStore;
use crate::utils::error::{ProximityError, Result};

pub const DEFAULT_COLLECTION_KEY: &str = "storedPoints";

/// Reads and writes [`RoadPoint`]s in one named list of the external store.
///
/// Points are prepended, so `list_all` yields the most recent point first.
pub struct PointStore<S: ListStore> {
    store: S,
    collection_key: String,
}

impl<S: ListStore> PointStore<S> {
    pub fn new(store: S, collection_key: impl Into<String>) -> Self {
        Self {
            store,
            collection_key: collection_key.into(),
        }
    }

    pub async fn append(&self, point: &RoadPoint) -> Result<()> {
        let record = serde_json::to_vec(point)?;
        self.store.push_front(&self.collection_key, record).await?;
        tracing::debug!(
            "Appended '{}' to collection '{}'",
            point.road_name,
            self.collection_key
        );
        Ok(())
    }

    /// All decodable points in store order. Corrupt records are logged and skipped.
    pub async fn list_all(&self) -> Result<Vec<RoadPoint>> {
        let records = self.store.range_all(&self.collection_key).await?;
        let total = records.len();

        let points: Vec<RoadPoint> = records
            .iter()
            .enumerate()
            .filter_map(|(index, record)| match decode_record(record) {
                Ok(point) => Some(point),
                Err(e) => {
                    tracing::warn!(
                        "⚠️ Skipping record {} of collection '{}': {}",
                        index,
                        self.collection_key,
                        e
                    );
                    None
                }
            })
            .collect();

        tracing::debug!(
            "Loaded {}/{} records from collection '{}'",
            points.len(),
            total,
            self.collection_key
        );
        Ok(points)
    }
}

fn decode_record(record: &[u8]) -> Result<RoadPoint> {
    let text = std::str::from_utf8(record).map_err(|e| ProximityError::Deserialization {
        message: format!("record is not valid UTF-8: {}", e),
    })?;
    serde_json::from_str(text).map_err(|e| ProximityError::Deserialization {
        message: e.to_string(),
    })
}
