//! Request parsing and validation.
//!
//! Turns a raw JSON body into a typed [`Action`] whose coordinates are already
//! range-checked, or fails with one of the validation-class errors.

use crate::domain::model::Coordinate;
use crate::utils::error::{ProximityError, Result};
use serde_json::{Map, Value};

pub const MAX_LATITUDE: f64 = 90.0;
pub const MAX_COORDINATE: f64 = 180.0;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    StoreRoadPoint {
        road_name: String,
        coordinate: Coordinate,
        distance: f64,
    },
    CalculateDistance {
        from: Coordinate,
        to: Coordinate,
    },
    CheckNearby {
        coordinate: Coordinate,
    },
    ResolveRoadName {
        coordinate: Coordinate,
    },
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::StoreRoadPoint { .. } => "storeRoadPoint",
            Action::CalculateDistance { .. } => "calculateDistance",
            Action::CheckNearby { .. } => "checkNearby",
            Action::ResolveRoadName { .. } => "resolveRoadName",
        }
    }

    /// Parse a raw request body.
    pub fn parse(body: &str) -> Result<Self> {
        let value: Value =
            serde_json::from_str(body).map_err(|e| ProximityError::MalformedRequest {
                message: format!("Request body is not valid JSON: {}", e),
            })?;
        Self::from_value(&value)
    }

    pub fn from_value(value: &Value) -> Result<Self> {
        let fields = value
            .as_object()
            .ok_or_else(|| ProximityError::MalformedRequest {
                message: "Request body must be a JSON object".to_string(),
            })?;

        let action = match fields.get("action") {
            None | Some(Value::Null) => {
                return Err(ProximityError::MalformedRequest {
                    message: "Missing action parameter".to_string(),
                })
            }
            Some(Value::String(action)) if action.trim().is_empty() => {
                return Err(ProximityError::MalformedRequest {
                    message: "Missing action parameter".to_string(),
                })
            }
            Some(Value::String(action)) => action.as_str(),
            Some(other) => {
                return Err(ProximityError::MalformedRequest {
                    message: format!("Action must be a string, got {}", other),
                })
            }
        };

        match action {
            "storeRoadPoint" => Ok(Action::StoreRoadPoint {
                road_name: required_name(fields, "roadName")?,
                coordinate: required_coordinate(fields, "latitude", "longitude")?,
                distance: required_distance(fields, "distance")?,
            }),
            "calculateDistance" => Ok(Action::CalculateDistance {
                from: required_coordinate(fields, "latitude1", "longitude1")?,
                to: required_coordinate(fields, "latitude2", "longitude2")?,
            }),
            "checkNearby" => Ok(Action::CheckNearby {
                coordinate: required_coordinate(fields, "latitude", "longitude")?,
            }),
            "resolveRoadName" => Ok(Action::ResolveRoadName {
                coordinate: required_coordinate(fields, "latitude", "longitude")?,
            }),
            other => Err(ProximityError::UnsupportedAction {
                action: other.to_string(),
            }),
        }
    }
}

/// Finite and within ±180.
pub fn validate_component(field: &str, value: f64) -> Result<f64> {
    if !value.is_finite() || value.abs() > MAX_COORDINATE {
        return Err(ProximityError::invalid_coordinate(field, value));
    }
    Ok(value)
}

pub fn validate_latitude(field: &str, value: f64) -> Result<f64> {
    let value = validate_component(field, value)?;
    if value.abs() > MAX_LATITUDE {
        return Err(ProximityError::invalid_coordinate(field, value));
    }
    Ok(value)
}

pub fn validate_longitude(field: &str, value: f64) -> Result<f64> {
    validate_component(field, value)
}

pub fn validate_coordinate(latitude: f64, longitude: f64) -> Result<Coordinate> {
    validate_named_coordinate("latitude", "longitude", latitude, longitude)
}

pub fn validate_named_coordinate(
    lat_field: &str,
    lon_field: &str,
    latitude: f64,
    longitude: f64,
) -> Result<Coordinate> {
    Ok(Coordinate::new(
        validate_latitude(lat_field, latitude)?,
        validate_longitude(lon_field, longitude)?,
    ))
}

/// Road names are trimmed; blank counts as absent.
pub fn validate_road_name(field: &str, name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ProximityError::missing(field));
    }
    Ok(name.to_string())
}

/// The user-supplied distance must be a finite, non-negative number of km.
pub fn validate_distance(field: &str, distance: f64) -> Result<f64> {
    if !distance.is_finite() || distance < 0.0 {
        return Err(ProximityError::invalid_coordinate(field, distance));
    }
    Ok(distance)
}

/// Explicit `null` is treated the same as an absent field.
fn required<'a>(fields: &'a Map<String, Value>, field: &str) -> Result<&'a Value> {
    match fields.get(field) {
        None | Some(Value::Null) => Err(ProximityError::missing(field)),
        Some(value) => Ok(value),
    }
}

/// Accepts JSON numbers and numeric-looking strings.
fn coerce_number(field: &str, value: &Value) -> Result<f64> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| ProximityError::invalid_coordinate(field, n)),
        // Report the raw text, not its JSON encoding.
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| ProximityError::invalid_coordinate(field, s)),
        other => Err(ProximityError::invalid_coordinate(field, other)),
    }
}

fn required_coordinate(
    fields: &Map<String, Value>,
    lat_field: &str,
    lon_field: &str,
) -> Result<Coordinate> {
    let latitude = coerce_number(lat_field, required(fields, lat_field)?)?;
    let longitude = coerce_number(lon_field, required(fields, lon_field)?)?;
    validate_named_coordinate(lat_field, lon_field, latitude, longitude)
}

fn required_name(fields: &Map<String, Value>, field: &str) -> Result<String> {
    match required(fields, field)? {
        Value::String(name) => validate_road_name(field, name),
        _ => Err(ProximityError::MalformedRequest {
            message: format!("{} must be a string", field),
        }),
    }
}

fn required_distance(fields: &Map<String, Value>, field: &str) -> Result<f64> {
    let distance = coerce_number(field, required(fields, field)?)?;
    validate_distance(field, distance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn nearby(latitude: Value, longitude: Value) -> Result<Action> {
        Action::from_value(&json!({
            "action": "checkNearby",
            "latitude": latitude,
            "longitude": longitude,
        }))
    }

    #[test]
    fn test_latitude_bounds() {
        assert!(nearby(json!(90), json!(0)).is_ok());
        assert!(nearby(json!(-90), json!(0)).is_ok());
        assert!(matches!(
            nearby(json!(91), json!(0)),
            Err(ProximityError::InvalidCoordinate { field, .. }) if field == "latitude"
        ));
        assert!(matches!(
            nearby(json!(-90.0001), json!(0)),
            Err(ProximityError::InvalidCoordinate { .. })
        ));
    }

    #[test]
    fn test_longitude_bounds() {
        assert!(nearby(json!(0), json!(180)).is_ok());
        assert!(nearby(json!(0), json!(-180)).is_ok());
        assert!(matches!(
            nearby(json!(0), json!(180.5)),
            Err(ProximityError::InvalidCoordinate { field, .. }) if field == "longitude"
        ));
    }

    #[test]
    fn test_numeric_strings_are_coerced() {
        let action = nearby(json!("23.2599"), json!(" 77.4126 ")).unwrap();
        assert_eq!(
            action,
            Action::CheckNearby {
                coordinate: Coordinate::new(23.2599, 77.4126)
            }
        );
    }

    #[test]
    fn test_uncoercible_values_are_invalid_coordinates() {
        for bad in [json!("north"), json!(true), json!([1, 2]), json!("NaN"), json!("inf")] {
            assert!(
                matches!(nearby(bad.clone(), json!(0)), Err(ProximityError::InvalidCoordinate { .. })),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_string_coordinate_error_shows_raw_text() {
        let err = nearby(json!("north"), json!(0)).unwrap_err();
        assert_eq!(err.to_string(), "Invalid coordinate for latitude: north");

        let err = nearby(json!(0), json!(" east ")).unwrap_err();
        assert_eq!(err.to_string(), "Invalid coordinate for longitude:  east ");
    }

    #[test]
    fn test_missing_action_is_malformed() {
        let err = Action::from_value(&json!({"latitude": 1, "longitude": 2})).unwrap_err();
        assert!(matches!(err, ProximityError::MalformedRequest { .. }));
    }

    #[test]
    fn test_blank_action_is_missing() {
        for blank in ["", "   ", "\t"] {
            let err = Action::from_value(&json!({"action": blank})).unwrap_err();
            assert!(
                matches!(&err, ProximityError::MalformedRequest { message } if message == "Missing action parameter"),
                "{blank:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn test_unparsable_body_is_malformed() {
        assert!(matches!(
            Action::parse("{not json"),
            Err(ProximityError::MalformedRequest { .. })
        ));
        assert!(matches!(
            Action::parse("[1, 2, 3]"),
            Err(ProximityError::MalformedRequest { .. })
        ));
        assert!(matches!(
            Action::parse(r#"{"action": 7}"#),
            Err(ProximityError::MalformedRequest { .. })
        ));
    }

    #[test]
    fn test_unknown_action() {
        assert!(matches!(
            Action::parse(r#"{"action": "deleteRoadPoint"}"#),
            Err(ProximityError::UnsupportedAction { action }) if action == "deleteRoadPoint"
        ));
    }

    #[test]
    fn test_missing_parameters_name_the_field() {
        let err = Action::parse(
            r#"{"action": "calculateDistance", "latitude1": 1, "longitude1": 2, "latitude2": 3}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ProximityError::MissingParameter { field } if field == "longitude2"));

        let err = nearby(Value::Null, json!(0)).unwrap_err();
        assert!(matches!(err, ProximityError::MissingParameter { field } if field == "latitude"));
    }

    #[test]
    fn test_store_road_point() {
        let action = Action::parse(
            r#"{"action": "storeRoadPoint", "roadName": "  Park Avenue Bhopal ",
                "latitude": 23.2599, "longitude": "77.4126", "distance": 3.7}"#,
        )
        .unwrap();
        assert_eq!(
            action,
            Action::StoreRoadPoint {
                road_name: "Park Avenue Bhopal".to_string(),
                coordinate: Coordinate::new(23.2599, 77.4126),
                distance: 3.7,
            }
        );
        assert_eq!(action.name(), "storeRoadPoint");
    }

    #[test]
    fn test_store_road_point_rejects_blank_name_and_bad_distance() {
        let blank = Action::from_value(&json!({
            "action": "storeRoadPoint", "roadName": "   ",
            "latitude": 1, "longitude": 1, "distance": 1
        }));
        assert!(matches!(blank, Err(ProximityError::MissingParameter { field }) if field == "roadName"));

        let negative = Action::from_value(&json!({
            "action": "storeRoadPoint", "roadName": "Ring Road",
            "latitude": 1, "longitude": 1, "distance": -2
        }));
        assert!(matches!(negative, Err(ProximityError::InvalidCoordinate { field, .. }) if field == "distance"));

        let no_distance = Action::from_value(&json!({
            "action": "storeRoadPoint", "roadName": "Ring Road", "latitude": 1, "longitude": 1
        }));
        assert!(matches!(no_distance, Err(ProximityError::MissingParameter { field }) if field == "distance"));
    }

    #[test]
    fn test_validate_coordinate() {
        assert!(validate_coordinate(22.5726, 88.3639).is_ok());
        assert!(validate_coordinate(f64::INFINITY, 0.0).is_err());
        assert!(validate_coordinate(0.0, f64::NAN).is_err());
    }
}
