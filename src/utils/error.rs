use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProximityError {
    #[error("Malformed request: {message}")]
    MalformedRequest { message: String },

    #[error("Missing required parameter: {field}")]
    MissingParameter { field: String },

    #[error("Invalid coordinate for {field}: {value}")]
    InvalidCoordinate { field: String, value: String },

    #[error("Unsupported action: {action}")]
    UnsupportedAction { action: String },

    #[error("Point store unavailable: {message}")]
    StoreUnavailable { message: String },

    /// A single stored record could not be decoded. Recovered locally by the point store.
    #[error("Stored record could not be decoded: {message}")]
    Deserialization { message: String },

    #[error("Road name lookup failed: {message}")]
    GeocodingError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Store,
    Upstream,
    Configuration,
    Internal,
}

impl ProximityError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ProximityError::MalformedRequest { .. }
            | ProximityError::MissingParameter { .. }
            | ProximityError::InvalidCoordinate { .. }
            | ProximityError::UnsupportedAction { .. } => ErrorCategory::Validation,
            ProximityError::StoreUnavailable { .. } | ProximityError::Deserialization { .. } => {
                ErrorCategory::Store
            }
            ProximityError::GeocodingError { .. } => ErrorCategory::Upstream,
            ProximityError::ConfigError { .. }
            | ProximityError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            ProximityError::IoError(_) | ProximityError::SerializationError(_) => {
                ErrorCategory::Internal
            }
        }
    }

    /// Validation failures are the caller's fault; everything else is ours.
    pub fn is_client_error(&self) -> bool {
        self.category() == ErrorCategory::Validation
    }

    pub fn status_code(&self) -> u16 {
        if self.is_client_error() {
            400
        } else {
            500
        }
    }

    pub(crate) fn invalid_coordinate(field: &str, value: impl ToString) -> Self {
        ProximityError::InvalidCoordinate {
            field: field.to_string(),
            value: value.to_string(),
        }
    }

    pub(crate) fn missing(field: &str) -> Self {
        ProximityError::MissingParameter {
            field: field.to_string(),
        }
    }

    pub(crate) fn store_unavailable(message: impl Into<String>) -> Self {
        ProximityError::StoreUnavailable {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ProximityError>;
