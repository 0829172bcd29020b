use crate::utils::error::{ProximityError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    validate_url_scheme(field_name, url_str, &["http", "https"])
}

pub fn validate_redis_url(field_name: &str, url_str: &str) -> Result<()> {
    validate_url_scheme(field_name, url_str, &["redis", "rediss", "redis+unix", "unix"])
}

fn validate_url_scheme(field_name: &str, url_str: &str, schemes: &[&str]) -> Result<()> {
    if url_str.is_empty() {
        return Err(ProximityError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) if schemes.contains(&url.scheme()) => Ok(()),
        Ok(url) => Err(ProximityError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!(
                "Unsupported URL scheme: {}. Allowed schemes: {}",
                url.scheme(),
                schemes.join(", ")
            ),
        }),
        Err(e) => Err(ProximityError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ProximityError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    // NaN fails both comparisons, so reject it explicitly.
    if !(value >= min && value <= max) {
        return Err(ProximityError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("geocoder_endpoint", "https://example.com/reverse").is_ok());
        assert!(validate_url("geocoder_endpoint", "http://example.com").is_ok());
        assert!(validate_url("geocoder_endpoint", "").is_err());
        assert!(validate_url("geocoder_endpoint", "invalid-url").is_err());
        assert!(validate_url("geocoder_endpoint", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_redis_url() {
        assert!(validate_redis_url("redis_url", "redis://127.0.0.1:6379").is_ok());
        assert!(validate_redis_url("redis_url", "rediss://user:pw@cache.example.com:6380/0").is_ok());
        assert!(validate_redis_url("redis_url", "http://127.0.0.1:6379").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("search_radius_km", 2.0, 0.001, 100.0).is_ok());
        assert!(validate_range("search_radius_km", 0.0, 0.001, 100.0).is_err());
        assert!(validate_range("search_radius_km", f64::NAN, 0.001, 100.0).is_err());
        assert!(validate_range("connect_timeout_secs", 121u64, 1, 120).is_err());
    }

    #[test]
    fn test_validate_non_empty_string() {
        assert!(validate_non_empty_string("geocoder_user_agent", "road-proximity/0.1").is_ok());
        assert!(validate_non_empty_string("geocoder_user_agent", "   ").is_err());
    }
}
