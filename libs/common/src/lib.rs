//! Shared infrastructure for site planner tools
//!
//! - `config_loader`: layered figment configuration (defaults, file, environment)
//! - `logging`: tracing subscriber setup with the bracketed console format
//! - `serde_defaults`: default values referenced by serde attributes

pub mod config_loader;
pub mod logging;
pub mod serde_defaults;

pub use config_loader::{load_config, LogSettings, PlannerConfig, ENV_PREFIX};
