use crate::domain::model::Coordinate;
use crate::domain::ports::RoadNameResolver;
use crate::utils::error::{ProximityError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://nominatim.openstreetmap.org/reverse";

/// Address keys tried, in order, when `road` is absent.
const FALLBACK_FIELDS: [&str; 5] = ["street", "pedestrian", "path", "footway", "highway"];

/// Reverse geocoder speaking the Nominatim `/reverse?format=json` protocol.
pub struct NominatimResolver {
    client: Client,
    endpoint: String,
}

impl NominatimResolver {
    pub fn new(endpoint: impl Into<String>, user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()
            .map_err(|e| ProximityError::ConfigError {
                message: format!("Failed to build geocoder HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl RoadNameResolver for NominatimResolver {
    async fn resolve(&self, coordinate: Coordinate) -> Result<String> {
        tracing::debug!("Reverse geocoding via {}", self.endpoint);

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("format", "json".to_string()),
                ("lat", coordinate.latitude.to_string()),
                ("lon", coordinate.longitude.to_string()),
            ])
            .send()
            .await
            .map_err(|e| geocoding_error(format!("Network error: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(geocoding_error(format!("Unexpected response code: {}", status)));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| geocoding_error(format!("Error processing response: {}", e)))?;

        extract_road_name(&body).ok_or_else(|| {
            tracing::warn!("No road name in geocoder response: {}", body);
            geocoding_error("Road name not found in response")
        })
    }
}

/// `address.road`, else the first present fallback field.
pub fn extract_road_name(response: &Value) -> Option<String> {
    let address = response.get("address")?.as_object()?;

    std::iter::once("road")
        .chain(FALLBACK_FIELDS)
        .find_map(|field| address.get(field).and_then(Value::as_str))
        .map(str::to_string)
}

fn geocoding_error(message: impl Into<String>) -> ProximityError {
    ProximityError::GeocodingError {
        message: message.into(),
    }
}
