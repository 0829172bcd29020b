use crate::config::ServiceConfig;
use crate::utils::error::Result;
use clap::{Parser, Subcommand};
use serde_json::json;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "road-proximity")]
#[command(about = "Store road points and find the ones near a location")]
pub struct CliConfig {
    #[arg(long, global = true, help = "TOML configuration file (defaults to environment variables)")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Override the Redis connection URL")]
    pub redis_url: Option<String>,

    #[arg(long, global = true, help = "Keep points in process memory instead of Redis")]
    pub memory_store: bool,

    #[arg(long, global = true, help = "Override the nearby search radius in km")]
    pub radius_km: Option<f64>,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Run one raw JSON request body ("-" reads it from stdin)
    Invoke { body: String },
    /// Store a named road point
    Store {
        #[arg(long)]
        name: String,
        #[arg(long, allow_negative_numbers = true)]
        latitude: f64,
        #[arg(long, allow_negative_numbers = true)]
        longitude: f64,
        #[arg(long, default_value = "0")]
        distance: f64,
    },
    /// Great-circle distance between two coordinates
    Distance {
        #[arg(long, allow_negative_numbers = true)]
        latitude1: f64,
        #[arg(long, allow_negative_numbers = true)]
        longitude1: f64,
        #[arg(long, allow_negative_numbers = true)]
        latitude2: f64,
        #[arg(long, allow_negative_numbers = true)]
        longitude2: f64,
    },
    /// Stored points within the search radius of a coordinate
    Nearby {
        #[arg(long, allow_negative_numbers = true)]
        latitude: f64,
        #[arg(long, allow_negative_numbers = true)]
        longitude: f64,
    },
    /// Reverse geocode a coordinate to a road name
    Resolve {
        #[arg(long, allow_negative_numbers = true)]
        latitude: f64,
        #[arg(long, allow_negative_numbers = true)]
        longitude: f64,
    },
    /// Store three sample points, then run a distance and a nearby query
    Demo,
}

impl Command {
    /// The JSON request body for the single-request subcommands.
    pub fn request_body(&self) -> Option<serde_json::Value> {
        let body = match self {
            Command::Invoke { .. } | Command::Demo => return None,
            Command::Store {
                name,
                latitude,
                longitude,
                distance,
            } => json!({
                "action": "storeRoadPoint",
                "roadName": name,
                "latitude": latitude,
                "longitude": longitude,
                "distance": distance,
            }),
            Command::Distance {
                latitude1,
                longitude1,
                latitude2,
                longitude2,
            } => json!({
                "action": "calculateDistance",
                "latitude1": latitude1,
                "longitude1": longitude1,
                "latitude2": latitude2,
                "longitude2": longitude2,
            }),
            Command::Nearby {
                latitude,
                longitude,
            } => json!({"action": "checkNearby", "latitude": latitude, "longitude": longitude}),
            Command::Resolve {
                latitude,
                longitude,
            } => json!({"action": "resolveRoadName", "latitude": latitude, "longitude": longitude}),
        };
        Some(body)
    }
}

impl CliConfig {
    /// File (or environment) configuration with command-line overrides applied.
    pub fn service_config(&self) -> Result<ServiceConfig> {
        let mut config = match &self.config {
            Some(path) => ServiceConfig::from_file(path)?,
            None => ServiceConfig::from_env()?,
        };

        if let Some(redis_url) = &self.redis_url {
            config.redis_url = redis_url.clone();
        }
        if let Some(radius_km) = self.radius_km {
            config.search_radius_km = radius_km;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_negative_coordinates() {
        let cli = CliConfig::try_parse_from([
            "road-proximity",
            "--memory-store",
            "nearby",
            "--latitude",
            "-33.8688",
            "--longitude",
            "151.2093",
        ])
        .unwrap();

        assert!(cli.memory_store);
        let body = cli.command.request_body().unwrap();
        assert_eq!(body["action"], "checkNearby");
        assert_eq!(body["latitude"], -33.8688);
    }

    #[test]
    fn test_overrides_apply_on_top_of_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("service.toml");
        std::fs::write(&path, "[search]\nradius_km = 7.5\n").unwrap();

        let cli = CliConfig::try_parse_from([
            "road-proximity",
            "--config",
            path.to_str().unwrap(),
            "--redis-url",
            "redis://cache.internal:6380",
            "demo",
        ])
        .unwrap();

        let config = cli.service_config().unwrap();
        assert_eq!(config.search_radius_km, 7.5);
        assert_eq!(config.redis_url, "redis://cache.internal:6380");
        assert!(cli.command.request_body().is_none());
    }
}
