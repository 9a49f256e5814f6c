//! Site Model Error Types

use thiserror::Error;

/// Result type for site-model operations
pub type Result<T> = std::result::Result<T, SiteError>;

/// Site model errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SiteError {
    /// A device is wider than the site width cap, so no row can hold it
    #[error("Item {device_type} width {width_ft} exceeds max width {max_width_ft}")]
    LayoutInfeasible {
        device_type: String,
        width_ft: f64,
        max_width_ft: f64,
    },

    /// Catalog entry violates its dimensional or numeric invariants
    #[error("Invalid catalog entry {device_type}: {reason}")]
    InvalidCatalog { device_type: String, reason: String },

    /// Configuration value out of range
    #[error("Invalid configuration: {field}: {reason}")]
    InvalidConfig { field: String, reason: String },
}

impl SiteError {
    pub fn layout_infeasible(
        device_type: impl Into<String>,
        width_ft: f64,
        max_width_ft: f64,
    ) -> Self {
        Self::LayoutInfeasible {
            device_type: device_type.into(),
            width_ft,
            max_width_ft,
        }
    }

    pub fn invalid_catalog(device_type: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidCatalog {
            device_type: device_type.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Whether the error stems from the caller's request rather than deployment config
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::LayoutInfeasible { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_layout_errors_are_client_errors() {
        assert!(SiteError::layout_infeasible("MegapackXL", 40.0, 35.0).is_client_error());
        assert!(!SiteError::invalid_catalog("PowerPack", "zero width").is_client_error());
        assert!(!SiteError::invalid_config("max_width_ft", "must be positive").is_client_error());
    }
}
