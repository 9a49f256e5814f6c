//! Configuration loading for site planner tools
//!
//! Priority (highest to lowest):
//! 1. Environment variables prefixed with `SITE_PLANNER_` (nested keys split on `__`)
//! 2. Explicit config file (`.yaml`, `.yml`, `.toml` or `.json`)
//! 3. Built-in defaults (standard catalog, 100 ft width cap)

use crate::serde_defaults;
use errors::{PlannerError, PlannerResult};
use figment::{
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use site_model::{DeviceCatalog, SiteEngine};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Environment variable prefix for overrides
pub const ENV_PREFIX: &str = "SITE_PLANNER_";

/// Logging section of the planner configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogSettings {
    /// EnvFilter directive, e.g. "info" or "info,site_model=debug"
    #[serde(default = "serde_defaults::log_level")]
    pub level: String,

    /// Emit JSON lines instead of the bracketed text format
    #[serde(default)]
    pub json: bool,

    /// Directory for a daily rolling log file; console only when unset
    #[serde(default)]
    pub dir: Option<PathBuf>,

    #[serde(default = "serde_defaults::log_file_prefix")]
    pub file_prefix: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: serde_defaults::log_level(),
            json: false,
            dir: None,
            file_prefix: serde_defaults::log_file_prefix(),
        }
    }
}

/// Deployment configuration: catalog, width cap and logging
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Maximum site width (ft)
    #[serde(default = "serde_defaults::max_width_ft")]
    pub max_width_ft: f64,

    #[serde(default)]
    pub catalog: DeviceCatalog,

    #[serde(default)]
    pub log: LogSettings,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_width_ft: serde_defaults::max_width_ft(),
            catalog: DeviceCatalog::standard(),
            log: LogSettings::default(),
        }
    }
}

impl PlannerConfig {
    /// Check width cap and catalog invariants
    pub fn validate(&self) -> PlannerResult<()> {
        self.build_engine().map(|_| ())
    }

    /// Engine bound to this configuration's catalog and width cap
    pub fn build_engine(&self) -> PlannerResult<SiteEngine> {
        Ok(SiteEngine::new(self.catalog.clone(), self.max_width_ft)?)
    }

    /// Render as YAML for display
    pub fn to_yaml(&self) -> PlannerResult<String> {
        serde_yaml::to_string(self).map_err(|e| PlannerError::internal(e.to_string()))
    }
}

/// Build the layered figment without extracting it
pub fn planner_figment(path: Option<&Path>) -> PlannerResult<Figment> {
    let mut figment = Figment::from(Serialized::defaults(PlannerConfig::default()));

    if let Some(path) = path {
        figment = merge_file(figment, path)?;
    }

    Ok(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
}

/// Load and validate the planner configuration
pub fn load_config(path: Option<&Path>) -> PlannerResult<PlannerConfig> {
    let config: PlannerConfig = planner_figment(path)?.extract()?;
    config.validate()?;

    let widest = config.catalog.max_device_width();
    if widest > config.max_width_ft {
        warn!(
            widest_device_ft = widest,
            max_width_ft = config.max_width_ft,
            "Catalog has devices wider than the site width cap; requests for them will fail"
        );
    }

    match path {
        Some(p) => info!("Loaded configuration from {}", p.display()),
        None => debug!("Using default configuration"),
    }
    Ok(config)
}

fn merge_file(figment: Figment, path: &Path) -> PlannerResult<Figment> {
    if !path.is_file() {
        return Err(PlannerError::configuration(format!(
            "Config file not found: {}",
            path.display()
        )));
    }

    let extension = path
        .extension()
        .and_then(|s| s.to_str())
        .ok_or_else(|| PlannerError::configuration("Config file must have an extension"))?;

    match extension {
        "toml" => Ok(figment.merge(Toml::file(path))),
        "yaml" | "yml" => Ok(figment.merge(Yaml::file(path))),
        "json" => Ok(figment.merge(Json::file(path))),
        _ => Err(PlannerError::configuration(format!(
            "Unsupported config file format: {}",
            extension
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use site_model::SiteError;
    use tracing_test::traced_test;

    #[test]
    fn test_defaults_without_file() {
        Jail::expect_with(|_jail| {
            let config = load_config(None).expect("defaults load");
            assert_eq!(config, PlannerConfig::default());
            assert_eq!(config.max_width_ft, 100.0);
            assert_eq!(config.log.level, "info");
            Ok(())
        });
    }

    #[test]
    fn test_yaml_file_partially_overrides_catalog() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "site.yaml",
                r#"
max_width_ft: 80
catalog:
  Megapack:
    width: 60
"#,
            )?;
            let config = load_config(Some(Path::new("site.yaml"))).expect("yaml load");
            assert_eq!(config.max_width_ft, 80.0);
            assert_eq!(config.catalog.megapack.width, 60.0);
            // untouched fields keep their defaults
            assert_eq!(config.catalog.megapack.depth, 10.0);
            assert_eq!(config.catalog.megapack.unit_cost, 50_000.0);
            assert_eq!(config.catalog.megapack_xl, DeviceCatalog::standard().megapack_xl);
            Ok(())
        });
    }

    #[test]
    fn test_toml_file_and_env_override() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "site.toml",
                r#"
max_width_ft = 120

[log]
level = "warn"
"#,
            )?;
            jail.set_env("SITE_PLANNER_MAX_WIDTH_FT", "90");
            jail.set_env("SITE_PLANNER_LOG__JSON", "true");

            let config = load_config(Some(Path::new("site.toml"))).expect("toml load");
            assert_eq!(config.max_width_ft, 90.0);
            assert_eq!(config.log.level, "warn");
            assert!(config.log.json);
            Ok(())
        });
    }

    #[test]
    fn test_rejects_non_positive_width() {
        Jail::expect_with(|jail| {
            jail.create_file("site.json", r#"{ "max_width_ft": 0 }"#)?;
            let err = load_config(Some(Path::new("site.json"))).unwrap_err();
            assert!(matches!(
                err,
                PlannerError::Site(SiteError::InvalidConfig { .. })
            ));
            Ok(())
        });
    }

    #[test]
    #[traced_test]
    fn test_warns_when_catalog_exceeds_width_cap() {
        Jail::expect_with(|jail| {
            jail.create_file("site.yaml", "max_width_ft: 35\n")?;
            let config = load_config(Some(Path::new("site.yaml"))).expect("narrow cap loads");
            assert_eq!(config.max_width_ft, 35.0);
            Ok(())
        });
        assert!(logs_contain("wider than the site width cap"));
    }

    #[test]
    #[traced_test]
    fn test_no_width_warning_for_standard_cap() {
        Jail::expect_with(|_jail| {
            load_config(None).expect("defaults load");
            Ok(())
        });
        assert!(!logs_contain("wider than the site width cap"));
    }

    #[test]
    fn test_rejects_invalid_catalog_entry() {
        Jail::expect_with(|jail| {
            jail.create_file("site.yaml", "catalog:\n  PowerPack:\n    depth: -1\n")?;
            let err = load_config(Some(Path::new("site.yaml"))).unwrap_err();
            assert!(matches!(
                err,
                PlannerError::Site(SiteError::InvalidCatalog { .. })
            ));
            Ok(())
        });
    }

    #[test]
    fn test_missing_and_unsupported_files() {
        Jail::expect_with(|jail| {
            let missing = load_config(Some(Path::new("nope.yaml"))).unwrap_err();
            assert!(matches!(missing, PlannerError::Configuration(_)));

            jail.create_file("site.ini", "max_width_ft=10")?;
            let unsupported = load_config(Some(Path::new("site.ini"))).unwrap_err();
            assert!(unsupported.to_string().contains("Unsupported config file format"));
            Ok(())
        });
    }

    #[test]
    fn test_malformed_value_is_configuration_error() {
        Jail::expect_with(|jail| {
            jail.create_file("site.yaml", "max_width_ft: wide\n")?;
            let err = load_config(Some(Path::new("site.yaml"))).unwrap_err();
            assert!(matches!(err, PlannerError::Configuration(_)));
            Ok(())
        });
    }

    #[test]
    fn test_yaml_dump_round_trips() {
        let config = PlannerConfig::default();
        let yaml = config.to_yaml().unwrap();
        let parsed: PlannerConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, config);
    }
}
