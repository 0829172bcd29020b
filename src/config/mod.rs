#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::adapters::nominatim::{NominatimResolver, DEFAULT_ENDPOINT};
use crate::adapters::redis_store::RedisListStore;
use crate::core::engine::{ProximityEngine, DEFAULT_SEARCH_RADIUS_KM};
use crate::core::handler::RequestHandler;
use crate::core::point_store::{PointStore, DEFAULT_COLLECTION_KEY};
use crate::domain::ports::ListStore;
use crate::utils::error::{ProximityError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_range, validate_redis_url, validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";
pub const DEFAULT_USER_AGENT: &str = "road-proximity/0.1";
/// Half the Earth's circumference; any larger radius matches everything.
pub const MAX_SEARCH_RADIUS_KM: f64 = 20_037.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub redis_url: String,
    pub collection_key: String,
    pub search_radius_km: f64,
    pub connect_timeout_secs: u64,
    pub production: bool,
    pub geocoder_endpoint: String,
    pub geocoder_user_agent: String,
    pub geocoder_timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            redis_url: DEFAULT_REDIS_URL.to_string(),
            collection_key: DEFAULT_COLLECTION_KEY.to_string(),
            search_radius_km: DEFAULT_SEARCH_RADIUS_KM,
            connect_timeout_secs: 5,
            production: false,
            geocoder_endpoint: DEFAULT_ENDPOINT.to_string(),
            geocoder_user_agent: DEFAULT_USER_AGENT.to_string(),
            geocoder_timeout_secs: 10,
        }
    }
}

impl ServiceConfig {
    /// 從環境變數載入配置，未設定者使用預設值
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        Ok(Self {
            redis_url: env::var("REDIS_URL").unwrap_or(defaults.redis_url),
            collection_key: env::var("POINTS_COLLECTION").unwrap_or(defaults.collection_key),
            search_radius_km: parse_env("SEARCH_RADIUS_KM", defaults.search_radius_km)?,
            connect_timeout_secs: parse_env(
                "STORE_CONNECT_TIMEOUT_SECS",
                defaults.connect_timeout_secs,
            )?,
            production: env::var("APP_ENV")
                .map(|v| is_production(&v))
                .unwrap_or(defaults.production),
            geocoder_endpoint: env::var("GEOCODER_ENDPOINT").unwrap_or(defaults.geocoder_endpoint),
            geocoder_user_agent: env::var("GEOCODER_USER_AGENT")
                .unwrap_or(defaults.geocoder_user_agent),
            geocoder_timeout_secs: parse_env(
                "GEOCODER_TIMEOUT_SECS",
                defaults.geocoder_timeout_secs,
            )?,
        })
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn geocoder_timeout(&self) -> Duration {
        Duration::from_secs(self.geocoder_timeout_secs)
    }

    /// Build the request handler over `store`, wiring in the reverse geocoder.
    pub fn build_handler<S: ListStore>(&self, store: S) -> Result<RequestHandler<S>> {
        let resolver = NominatimResolver::new(
            self.geocoder_endpoint.clone(),
            &self.geocoder_user_agent,
            self.geocoder_timeout(),
        )?;
        let engine = ProximityEngine::new(
            PointStore::new(store, self.collection_key.clone()),
            self.search_radius_km,
        )
        .with_resolver(Arc::new(resolver));

        Ok(RequestHandler::new(engine, self.production))
    }

    /// The Redis store handle. Connects lazily on first request.
    pub fn redis_store(&self) -> Result<RedisListStore> {
        RedisListStore::connect_lazy(&self.redis_url, self.connect_timeout())
    }
}

impl Validate for ServiceConfig {
    fn validate(&self) -> Result<()> {
        validate_redis_url("redis_url", &self.redis_url)?;
        validate_non_empty_string("collection_key", &self.collection_key)?;
        validate_range(
            "search_radius_km",
            self.search_radius_km,
            f64::MIN_POSITIVE,
            MAX_SEARCH_RADIUS_KM,
        )?;
        validate_range("connect_timeout_secs", self.connect_timeout_secs, 1, 120)?;
        validate_url("geocoder_endpoint", &self.geocoder_endpoint)?;
        validate_non_empty_string("geocoder_user_agent", &self.geocoder_user_agent)?;
        validate_range("geocoder_timeout_secs", self.geocoder_timeout_secs, 1, 120)?;

        tracing::debug!("✅ Service configuration validation passed");
        Ok(())
    }
}

pub(crate) fn is_production(environment: &str) -> bool {
    matches!(
        environment.trim().to_ascii_lowercase().as_str(),
        "production" | "prod"
    )
}

fn parse_env<T: FromStr>(name: &str, default: T) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| ProximityError::InvalidConfigValueError {
                field: name.to_string(),
                value: raw.clone(),
                reason: e.to_string(),
            }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ServiceConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.collection_key, "storedPoints");
        assert_eq!(config.search_radius_km, 2.0);
        assert!(!config.production);
    }

    #[test]
    fn test_rejects_bad_values() {
        let zero_radius = ServiceConfig {
            search_radius_km: 0.0,
            ..ServiceConfig::default()
        };
        assert!(zero_radius.validate().is_err());

        let bad_store = ServiceConfig {
            redis_url: "http://localhost".to_string(),
            ..ServiceConfig::default()
        };
        assert!(bad_store.validate().is_err());

        let blank_key = ServiceConfig {
            collection_key: " ".to_string(),
            ..ServiceConfig::default()
        };
        assert!(blank_key.validate().is_err());
    }

    #[test]
    fn test_is_production() {
        assert!(is_production("production"));
        assert!(is_production(" PROD "));
        assert!(!is_production("development"));
        assert!(!is_production(""));
    }
}
