use crate::config::{is_production, ServiceConfig};
use crate::utils::error::{ProximityError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// On-disk layout of the service configuration. Every field is optional and
/// falls back to [`ServiceConfig::default`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub environment: Option<String>,
    pub store: Option<StoreSection>,
    pub search: Option<SearchSection>,
    pub geocoder: Option<GeocoderSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreSection {
    pub redis_url: Option<String>,
    pub collection_key: Option<String>,
    pub connect_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchSection {
    pub radius_km: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeocoderSection {
    pub endpoint: Option<String>,
    pub user_agent: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ProximityError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ProximityError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${REDIS_PASSWORD})，未定義者保留原文
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ProximityError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// Overlay the values present in this file onto `base`.
    pub fn apply_to(self, mut base: ServiceConfig) -> ServiceConfig {
        if let Some(environment) = self.environment {
            base.production = is_production(&environment);
        }
        if let Some(store) = self.store {
            if let Some(redis_url) = store.redis_url {
                base.redis_url = redis_url;
            }
            if let Some(collection_key) = store.collection_key {
                base.collection_key = collection_key;
            }
            if let Some(timeout) = store.connect_timeout_secs {
                base.connect_timeout_secs = timeout;
            }
        }
        if let Some(radius_km) = self.search.and_then(|s| s.radius_km) {
            base.search_radius_km = radius_km;
        }
        if let Some(geocoder) = self.geocoder {
            if let Some(endpoint) = geocoder.endpoint {
                base.geocoder_endpoint = endpoint;
            }
            if let Some(user_agent) = geocoder.user_agent {
                base.geocoder_user_agent = user_agent;
            }
            if let Some(timeout) = geocoder.timeout_secs {
                base.geocoder_timeout_secs = timeout;
            }
        }
        base
    }
}

impl ServiceConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(TomlConfig::from_file(path)?.apply_to(Self::default()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(TomlConfig::from_toml_str(content)?.apply_to(Self::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = ServiceConfig::from_toml_str("").unwrap();
        assert_eq!(config, ServiceConfig::default());
    }

    #[test]
    fn test_partial_file_overrides_only_given_fields() {
        let config = ServiceConfig::from_toml_str(
            r#"
environment = "production"

[search]
radius_km = 5.5

[geocoder]
timeout_secs = 3
"#,
        )
        .unwrap();

        assert!(config.production);
        assert_eq!(config.search_radius_km, 5.5);
        assert_eq!(config.geocoder_timeout_secs, 3);
        assert_eq!(config.redis_url, "redis://127.0.0.1:6379");
        assert_eq!(config.collection_key, "storedPoints");
    }

    #[test]
    fn test_unknown_variables_are_left_verbatim() {
        let config = ServiceConfig::from_toml_str(
            r#"
[store]
redis_url = "redis://:${ROAD_PROXIMITY_SURELY_UNSET_VAR}@cache:6379"
"#,
        )
        .unwrap();
        assert_eq!(
            config.redis_url,
            "redis://:${ROAD_PROXIMITY_SURELY_UNSET_VAR}@cache:6379"
        );
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            ServiceConfig::from_toml_str("[search\nradius_km = 1"),
            Err(ProximityError::ConfigError { .. })
        ));
    }
}
