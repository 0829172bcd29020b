use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A (latitude, longitude) pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// A named point persisted in the point collection. Immutable once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadPoint {
    pub road_name: String,
    #[serde(flatten)]
    pub coordinate: Coordinate,
    /// User-supplied distance in km, one decimal retained.
    pub distance: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreResult {
    pub message: String,
    pub point: RoadPoint,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistanceResult {
    pub distance: f64,
    pub unit: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyResult {
    pub nearby_points: Vec<RoadPoint>,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadNameResult {
    pub road_name: String,
    #[serde(flatten)]
    pub coordinate: Coordinate,
}

/// Outcome of one dispatched action, serialized as the response body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ActionResponse {
    Stored(StoreResult),
    Distance(DistanceResult),
    Nearby(NearbyResult),
    RoadName(RoadNameResult),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_road_point_wire_format() {
        let point = RoadPoint {
            road_name: "Raisen Road".to_string(),
            coordinate: Coordinate::new(23.251858, 77.484537),
            distance: 0.5,
            created_at: Utc.with_ymd_and_hms(2024, 1, 15, 8, 30, 0).unwrap(),
        };

        let json = serde_json::to_value(&point).unwrap();
        assert_eq!(json["roadName"], "Raisen Road");
        assert_eq!(json["latitude"], 23.251858);
        assert_eq!(json["longitude"], 77.484537);
        assert_eq!(json["distance"], 0.5);
        assert_eq!(json["createdAt"], "2024-01-15T08:30:00Z");
    }

    #[test]
    fn test_nearby_result_uses_camel_case() {
        let result = NearbyResult {
            nearby_points: vec![],
            count: 0,
        };
        let json = serde_json::to_string(&ActionResponse::Nearby(result)).unwrap();
        assert_eq!(json, r#"{"nearbyPoints":[],"count":0}"#);
    }
}
