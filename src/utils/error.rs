use std::fmt;
use thiserror::Error;

/// What kind of name a lookup was trying to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKind {
    City,
    Service,
    Doctor,
    Clinic,
}

impl fmt::Display for LookupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LookupKind::City => "city",
            LookupKind::Service => "service",
            LookupKind::Doctor => "doctor",
            LookupKind::Clinic => "clinic",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum HunterError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Upstream returned {status} for {endpoint}")]
    UpstreamError { endpoint: String, status: u16 },

    #[error("Malformed response from {endpoint}: {message}")]
    MalformedResponse { endpoint: String, message: String },

    #[error("No {kind} named '{name}'")]
    NotFound { kind: LookupKind, name: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Cache error: {message}")]
    CacheError { message: String },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Lookup,
    Storage,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl HunterError {
    pub fn malformed(endpoint: &str, message: impl Into<String>) -> Self {
        HunterError::MalformedResponse {
            endpoint: endpoint.to_string(),
            message: message.into(),
        }
    }

    pub fn not_found(kind: LookupKind, name: &str) -> Self {
        HunterError::NotFound {
            kind,
            name: name.to_string(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            HunterError::ApiError(_) | HunterError::UpstreamError { .. } => ErrorCategory::Network,
            HunterError::MalformedResponse { .. }
            | HunterError::SerializationError(_)
            | HunterError::CsvError(_) => ErrorCategory::Data,
            HunterError::NotFound { .. } => ErrorCategory::Lookup,
            HunterError::IoError(_) | HunterError::CacheError { .. } => ErrorCategory::Storage,
            HunterError::ConfigValidationError { .. }
            | HunterError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Lookup => ErrorSeverity::Low,
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Data | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            HunterError::NotFound { kind, .. } => format!(
                "Run the '{}s' command to list the available names",
                kind
            ),
            HunterError::UpstreamError { status: 401, .. }
            | HunterError::UpstreamError { status: 403, .. } => {
                "Session token expired; refresh api.token or api.cookie in the config".to_string()
            }
            HunterError::ApiError(_) | HunterError::UpstreamError { .. } => {
                "Check network connectivity and api.base_url, then try again".to_string()
            }
            HunterError::MalformedResponse { .. } | HunterError::SerializationError(_) => {
                "The booking API changed its response format; update the client".to_string()
            }
            HunterError::IoError(_) | HunterError::CacheError { .. } | HunterError::CsvError(_) => {
                "Check permissions on cache.path and cache.export_dir, or delete the cache file"
                    .to_string()
            }
            HunterError::ConfigValidationError { field, .. }
            | HunterError::InvalidConfigValueError { field, .. } => {
                format!("Fix '{}' in the configuration file", field)
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            HunterError::NotFound { kind, name } => {
                format!("Could not find a {} called \"{}\"", kind, name)
            }
            HunterError::UpstreamError { status, .. } => {
                format!("The booking service answered with HTTP {}", status)
            }
            HunterError::ApiError(_) => "Could not reach the booking service".to_string(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, HunterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_names_kind_and_value() {
        let err = HunterError::not_found(LookupKind::Doctor, "Jan Kowalski");
        assert_eq!(err.to_string(), "No doctor named 'Jan Kowalski'");
        assert_eq!(err.category(), ErrorCategory::Lookup);
        assert!(err.recovery_suggestion().contains("doctors"));
    }

    #[test]
    fn test_severity_ordering() {
        let lookup = HunterError::not_found(LookupKind::City, "Atlantis");
        let cache = HunterError::CacheError {
            message: "corrupt".to_string(),
        };
        assert!(lookup.severity() < cache.severity());
    }
}
