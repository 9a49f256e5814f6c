//! Serde default value functions for configuration structs
//!
//! Used by `#[serde(default = "...")]` attributes in [`crate::config_loader`].

use site_model::DEFAULT_MAX_WIDTH_FT;

/// Default site width cap: 100 ft
pub fn max_width_ft() -> f64 {
    DEFAULT_MAX_WIDTH_FT
}

/// Default log filter: "info"
pub fn log_level() -> String {
    "info".to_string()
}

/// Default log file prefix: "site-planner.log"
pub fn log_file_prefix() -> String {
    "site-planner.log".to_string()
}
