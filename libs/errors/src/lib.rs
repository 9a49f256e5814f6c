//! Unified error handling for site planner tools
//!
//! Wraps engine, configuration and input errors in one type that knows how it should be
//! reported to a caller: an HTTP-style status code, a stable error code, and an
//! [`ErrorInfo`] payload.

use serde::{Deserialize, Serialize};
use site_model::SiteError;
use std::collections::HashMap;
use thiserror::Error;

// ============================================================================
// ErrorInfo - API error response type
// ============================================================================

/// Standard error information for API-shaped responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Error code (HTTP status)
    pub code: u16,
    /// Error message
    pub message: String,
    /// Detailed error description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Field-specific errors for validation
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub field_errors: HashMap<String, Vec<String>>,
}

impl ErrorInfo {
    /// Create a new ErrorInfo with just a message
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: 500,
            message: message.into(),
            details: None,
            field_errors: HashMap::new(),
        }
    }

    /// Set the error code
    pub fn with_code(mut self, code: u16) -> Self {
        self.code = code;
        self
    }

    /// Add details
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Add a field error
    pub fn add_field_error(mut self, field: impl Into<String>, error: impl Into<String>) -> Self {
        self.field_errors
            .entry(field.into())
            .or_default()
            .push(error.into());
        self
    }
}

// ============================================================================
// PlannerError - Main error type
// ============================================================================

/// Main error type for site planner tools
#[derive(Debug, Error)]
pub enum PlannerError {
    #[error(transparent)]
    Site(#[from] SiteError),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using PlannerError
pub type PlannerResult<T> = Result<T, PlannerError>;

impl PlannerError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Get the appropriate HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            // 400 Bad Request
            Self::Site(e) if e.is_client_error() => 400,
            Self::InvalidInput(_) => 400,

            // 500 Internal Server Error
            Self::Site(_)
            | Self::Configuration(_)
            | Self::Serialization(_)
            | Self::Io(_)
            | Self::Internal(_) => 500,
        }
    }

    /// Stable machine-readable code
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Site(SiteError::LayoutInfeasible { .. }) => "LAYOUT_INFEASIBLE",
            Self::Site(SiteError::InvalidCatalog { .. }) => "INVALID_CATALOG",
            Self::Site(SiteError::InvalidConfig { .. }) => "INVALID_CONFIG",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::Serialization(_) => "SERIALIZATION_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get log level
    pub fn log_level(&self) -> tracing::Level {
        if self.status_code() < 500 {
            tracing::Level::INFO
        } else {
            tracing::Level::ERROR
        }
    }

    /// Convert to API ErrorInfo
    pub fn to_error_info(&self) -> ErrorInfo {
        let mut error_info = ErrorInfo::new(self.to_string()).with_code(self.status_code());

        match self {
            Self::Site(SiteError::LayoutInfeasible {
                device_type,
                width_ft,
                max_width_ft,
            }) => {
                error_info = error_info.add_field_error(
                    format!("counts.{}", device_type),
                    format!("width {} ft exceeds site width {} ft", width_ft, max_width_ft),
                );
            },
            Self::Site(SiteError::InvalidConfig { field, reason }) => {
                error_info = error_info.add_field_error(field, reason);
            },
            Self::Site(SiteError::InvalidCatalog {
                device_type,
                reason,
            }) => {
                error_info = error_info.add_field_error(format!("catalog.{}", device_type), reason);
            },
            Self::Configuration(msg) => {
                error_info = error_info.with_details(msg.clone());
            },
            _ => {},
        }

        error_info
    }
}

// Conversion traits for common error types
impl From<serde_json::Error> for PlannerError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_syntax() || err.is_data() || err.is_eof() {
            Self::InvalidInput(err.to_string())
        } else {
            Self::Serialization(err.to_string())
        }
    }
}

impl From<figment::Error> for PlannerError {
    fn from(err: figment::Error) -> Self {
        Self::Configuration(err.to_string())
    }
}

// Tests
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        let infeasible = PlannerError::from(SiteError::layout_infeasible("MegapackXL", 120.0, 100.0));
        assert_eq!(infeasible.status_code(), 400);
        assert_eq!(infeasible.error_code(), "LAYOUT_INFEASIBLE");
        assert_eq!(PlannerError::invalid_input("bad").status_code(), 400);
        assert_eq!(PlannerError::configuration("bad").status_code(), 500);
        assert_eq!(
            PlannerError::from(SiteError::invalid_catalog("PowerPack", "zero width")).status_code(),
            500
        );
    }

    #[test]
    fn test_layout_infeasible_error_info() {
        let error = PlannerError::from(SiteError::layout_infeasible("MegapackXL", 120.0, 100.0));
        let info = error.to_error_info();
        assert_eq!(info.code, 400);
        assert!(info.message.contains("MegapackXL"));
        assert!(info.field_errors.contains_key("counts.MegapackXL"));
        assert_eq!(error.log_level(), tracing::Level::INFO);
    }

    #[test]
    fn test_error_info_serialization_skips_empty() {
        let info = ErrorInfo::new("boom").with_code(400);
        let value = serde_json::to_value(&info).unwrap();
        assert_eq!(value["code"], 400);
        assert_eq!(value["message"], "boom");
        assert!(value.get("details").is_none());
        assert!(value.get("field_errors").is_none());
    }

    #[test]
    fn test_json_syntax_error_is_invalid_input() {
        let err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let error = PlannerError::from(err);
        assert!(matches!(error, PlannerError::InvalidInput(_)));
        assert_eq!(error.status_code(), 400);
    }

    #[test]
    fn test_invalid_config_maps_field() {
        let error = PlannerError::from(SiteError::invalid_config("max_width_ft", "must be positive"));
        let info = error.to_error_info();
        assert_eq!(info.code, 500);
        assert_eq!(
            info.field_errors.get("max_width_ft"),
            Some(&vec!["must be positive".to_string()])
        );
        assert_eq!(error.log_level(), tracing::Level::ERROR);
    }
}
