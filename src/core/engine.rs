use crate::core::geo::{distance_between, round_to};
use crate::core::point_store::PointStore;
use crate::core::request::{
    validate_distance, validate_named_coordinate, validate_road_name, Action,
};
use crate::domain::model::{
    ActionResponse, Coordinate, DistanceResult, NearbyResult, RoadNameResult, RoadPoint,
    StoreResult,
};
use crate::domain::ports::{ListStore, RoadNameResolver};
use crate::utils::error::{ProximityError, Result};
use chrono::Utc;
use std::sync::Arc;

pub const DEFAULT_SEARCH_RADIUS_KM: f64 = 2.0;

/// Decimal places kept for stored coordinates and returned distances.
pub const COORDINATE_PRECISION: i32 = 6;
/// Decimal places kept for the user-supplied road distance.
pub const ROAD_DISTANCE_PRECISION: i32 = 1;

pub struct ProximityEngine<S: ListStore> {
    points: PointStore<S>,
    search_radius_km: f64,
    resolver: Option<Arc<dyn RoadNameResolver>>,
}

impl<S: ListStore> ProximityEngine<S> {
    pub fn new(points: PointStore<S>, search_radius_km: f64) -> Self {
        Self {
            points,
            search_radius_km,
            resolver: None,
        }
    }

    pub fn with_resolver(mut self, resolver: Arc<dyn RoadNameResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub async fn execute(&self, action: Action) -> Result<ActionResponse> {
        tracing::debug!("Dispatching action {}", action.name());

        match action {
            Action::StoreRoadPoint {
                road_name,
                coordinate,
                distance,
            } => self
                .store_road_point(&road_name, coordinate.latitude, coordinate.longitude, distance)
                .await
                .map(ActionResponse::Stored),
            Action::CalculateDistance { from, to } => self
                .calculate_distance(from.latitude, from.longitude, to.latitude, to.longitude)
                .map(ActionResponse::Distance),
            Action::CheckNearby { coordinate } => self
                .check_nearby(coordinate.latitude, coordinate.longitude)
                .await
                .map(ActionResponse::Nearby),
            Action::ResolveRoadName { coordinate } => self
                .resolve_road_name(coordinate.latitude, coordinate.longitude)
                .await
                .map(ActionResponse::RoadName),
        }
    }

    /// Persist a new point. Identical input stored twice yields two entries.
    pub async fn store_road_point(
        &self,
        road_name: &str,
        latitude: f64,
        longitude: f64,
        distance: f64,
    ) -> Result<StoreResult> {
        let road_name = validate_road_name("roadName", road_name)?;
        let coordinate = validate_named_coordinate("latitude", "longitude", latitude, longitude)?;
        let distance = validate_distance("distance", distance)?;

        let point = RoadPoint {
            road_name,
            coordinate: Coordinate::new(
                round_to(coordinate.latitude, COORDINATE_PRECISION),
                round_to(coordinate.longitude, COORDINATE_PRECISION),
            ),
            distance: round_to(distance, ROAD_DISTANCE_PRECISION),
            created_at: Utc::now(),
        };

        self.points.append(&point).await?;
        tracing::info!(
            "📍 Stored road point '{}' at ({}, {})",
            point.road_name,
            point.coordinate.latitude,
            point.coordinate.longitude
        );

        Ok(StoreResult {
            message: "Road point stored successfully".to_string(),
            point,
        })
    }

    pub fn calculate_distance(
        &self,
        latitude1: f64,
        longitude1: f64,
        latitude2: f64,
        longitude2: f64,
    ) -> Result<DistanceResult> {
        let from = validate_named_coordinate("latitude1", "longitude1", latitude1, longitude1)?;
        let to = validate_named_coordinate("latitude2", "longitude2", latitude2, longitude2)?;

        Ok(DistanceResult {
            distance: round_to(distance_between(from, to), COORDINATE_PRECISION),
            unit: "km",
        })
    }

    /// Every stored point within the search radius of the query, in store order.
    ///
    /// Brute-force scan over the whole collection; a spatial index would replace
    /// `list_all` here if the collection outgrew a linear pass.
    pub async fn check_nearby(&self, latitude: f64, longitude: f64) -> Result<NearbyResult> {
        let query = validate_named_coordinate("latitude", "longitude", latitude, longitude)?;

        let candidates = self.points.list_all().await?;
        let scanned = candidates.len();
        let nearby_points: Vec<RoadPoint> = candidates
            .into_iter()
            .filter(|point| distance_between(query, point.coordinate) <= self.search_radius_km)
            .collect();

        tracing::info!(
            "🔍 {} of {} points within {} km of ({}, {})",
            nearby_points.len(),
            scanned,
            self.search_radius_km,
            query.latitude,
            query.longitude
        );

        Ok(NearbyResult {
            count: nearby_points.len(),
            nearby_points,
        })
    }

    pub async fn resolve_road_name(&self, latitude: f64, longitude: f64) -> Result<RoadNameResult> {
        let coordinate = validate_named_coordinate("latitude", "longitude", latitude, longitude)?;
        let resolver = self
            .resolver
            .as_ref()
            .ok_or_else(|| ProximityError::UnsupportedAction {
                action: "resolveRoadName".to_string(),
            })?;

        let road_name = resolver.resolve(coordinate).await?;
        Ok(RoadNameResult {
            road_name,
            coordinate,
        })
    }
}
