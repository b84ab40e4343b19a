//! Server configuration.
//!
//! Loaded from an optional TOML file, then overridden by the `BIND_ADDR`
//! and `PORT` environment variables. Every field has a default, so an
//! empty file (or no file) yields a working configuration.

use std::path::{Path, PathBuf};

use aquawatch_analytics::{AnalyticsError, DUPLICATE_RADIUS_METERS, DuplicateOptions};
use aquawatch_spatial::{ZoomPolicy, ZoomPolicyError, ZoomStep};
use serde::Deserialize;

/// Environment variable naming a config file when `--config` is absent.
pub const CONFIG_ENV_VAR: &str = "AQUAWATCH_CONFIG";

/// Errors that can occur while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("Failed to read config file {}: {source}", .path.display())]
    Io {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The config file is not valid TOML for [`ServerConfig`].
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A zoom step or the fallback cell size is out of range.
    #[error("Invalid zoom configuration: {0}")]
    Zoom(#[from] ZoomPolicyError),

    /// Duplicate radius or timezone offset is out of range.
    #[error("Invalid analytics configuration: {0}")]
    Analytics(#[from] AnalyticsError),

    /// `max_working_set` must allow at least one report.
    #[error("max_working_set must be at least 1")]
    EmptyWorkingSet,
}

/// Limits and defaults for the analytics routes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Most reports fetched for one clustering, hotspot, duplicate or KPI
    /// request.
    pub max_working_set: usize,
    /// Hotspot cell size used when the request gives none.
    pub default_cell_size: f64,
    /// Duplicate grouping radius in meters.
    pub duplicate_radius_meters: f64,
    /// Offset from UTC, in minutes, that defines a calendar day.
    pub utc_offset_minutes: i32,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            max_working_set: 5_000,
            default_cell_size: 0.05,
            duplicate_radius_meters: DUPLICATE_RADIUS_METERS,
            utc_offset_minutes: 0,
        }
    }
}

/// Top-level server configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind.
    pub bind_addr: String,
    /// TCP port.
    pub port: u16,
    /// Analytics limits and defaults.
    pub analytics: AnalyticsConfig,
    /// Zoom-to-cell-size table (`[[zoom_steps]]`); `None` keeps the
    /// built-in table.
    pub zoom_steps: Option<Vec<ZoomStep>>,
    /// Cell size below the lowest zoom step.
    pub zoom_fallback_cell_size: f64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1".to_string(),
            port: 8080,
            analytics: AnalyticsConfig::default(),
            zoom_steps: None,
            zoom_fallback_cell_size: ZoomPolicy::default().fallback(),
        }
    }
}

impl ServerConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the document is malformed or any value is
    /// out of range.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::de::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from `path`, falling back to the file named by
    /// `AQUAWATCH_CONFIG`, then to defaults. Environment overrides are
    /// applied last.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a named file can't be read or is invalid.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let from_env = std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from);
        let mut config = match path.map(Path::to_path_buf).or(from_env) {
            Some(path) => {
                log::info!("Loading config from {}", path.display());
                let contents =
                    std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
                        path: path.clone(),
                        source,
                    })?;
                Self::from_toml_str(&contents)?
            }
            None => Self::default(),
        };

        config.apply_overrides(
            std::env::var("BIND_ADDR").ok(),
            std::env::var("PORT").ok(),
        );

        Ok(config)
    }

    /// Applies `BIND_ADDR` / `PORT` style overrides. An unparseable port is
    /// ignored with a warning.
    pub fn apply_overrides(&mut self, bind_addr: Option<String>, port: Option<String>) {
        if let Some(bind_addr) = bind_addr.filter(|a| !a.trim().is_empty()) {
            self.bind_addr = bind_addr;
        }
        if let Some(port) = port {
            match port.trim().parse() {
                Ok(port) => self.port = port,
                Err(e) => log::warn!("Ignoring PORT={port:?}: {e}"),
            }
        }
    }

    /// Checks every derived setting without building server state.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.analytics.max_working_set == 0 {
            return Err(ConfigError::EmptyWorkingSet);
        }
        self.zoom_policy()?;
        self.duplicate_options()?;
        Ok(())
    }

    /// Builds the zoom policy for marker clustering.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Zoom`] if a step is invalid.
    pub fn zoom_policy(&self) -> Result<ZoomPolicy, ConfigError> {
        let Some(steps) = &self.zoom_steps else {
            return Ok(ZoomPolicy::default());
        };
        Ok(ZoomPolicy::new(steps.clone(), self.zoom_fallback_cell_size)?)
    }

    /// Builds the duplicate grouping options.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Analytics`] if the radius or offset is invalid.
    pub fn duplicate_options(&self) -> Result<DuplicateOptions, ConfigError> {
        Ok(DuplicateOptions::new(
            self.analytics.duplicate_radius_meters,
            self.analytics.utc_offset_minutes,
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = ServerConfig::from_toml_str("").unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.zoom_policy().unwrap(), ZoomPolicy::default());
        assert_eq!(
            config.duplicate_options().unwrap(),
            DuplicateOptions::default()
        );
    }

    #[test]
    fn parses_full_document() {
        let config = ServerConfig::from_toml_str(
            r#"
bind_addr = "0.0.0.0"
port = 4000
zoom_fallback_cell_size = 0.1

[analytics]
max_working_set = 250
default_cell_size = 0.02
duplicate_radius_meters = 150.0
utc_offset_minutes = 180

[[zoom_steps]]
min_zoom = 15
cell_size = 0.002

[[zoom_steps]]
min_zoom = 11.5
cell_size = 0.02
"#,
        )
        .unwrap();

        assert_eq!(config.bind_addr, "0.0.0.0");
        assert_eq!(config.port, 4000);
        assert_eq!(config.analytics.max_working_set, 250);

        let policy = config.zoom_policy().unwrap();
        assert!((policy.cell_size_for(16.0) - 0.002).abs() < f64::EPSILON);
        assert!((policy.cell_size_for(12.0) - 0.02).abs() < f64::EPSILON);
        assert!((policy.cell_size_for(3.0) - 0.1).abs() < f64::EPSILON);

        let options = config.duplicate_options().unwrap();
        assert!((options.radius_meters() - 150.0).abs() < f64::EPSILON);
        assert_eq!(options.offset().local_minus_utc(), 180 * 60);
    }

    #[test]
    fn zoom_steps_accept_camel_case_keys() {
        let config =
            ServerConfig::from_toml_str("[[zoom_steps]]\nminZoom = 9\ncellSize = 0.2\n").unwrap();
        let policy = config.zoom_policy().unwrap();
        assert!((policy.cell_size_for(9.5) - 0.2).abs() < f64::EPSILON);
    }

    #[test]
    fn partial_analytics_section_keeps_defaults() {
        let config = ServerConfig::from_toml_str("[analytics]\nmax_working_set = 10\n").unwrap();
        assert_eq!(config.analytics.max_working_set, 10);
        assert!((config.analytics.default_cell_size - 0.05).abs() < f64::EPSILON);
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(matches!(
            ServerConfig::from_toml_str("port = \"abc\""),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            ServerConfig::from_toml_str("[analytics]\nduplicate_radius_meters = -1.0\n"),
            Err(ConfigError::Analytics(_))
        ));
        assert!(matches!(
            ServerConfig::from_toml_str("[analytics]\nmax_working_set = 0\n"),
            Err(ConfigError::EmptyWorkingSet)
        ));
        assert!(matches!(
            ServerConfig::from_toml_str("[[zoom_steps]]\nmin_zoom = 10\ncell_size = 0.0\n"),
            Err(ConfigError::Zoom(_))
        ));
    }

    #[test]
    fn overrides_replace_file_values() {
        let mut config = ServerConfig::default();
        config.apply_overrides(Some("0.0.0.0".to_string()), Some("9000".to_string()));
        assert_eq!(config.bind_addr, "0.0.0.0");
        assert_eq!(config.port, 9000);

        config.apply_overrides(None, Some("not-a-port".to_string()));
        assert_eq!(config.port, 9000);
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = ServerConfig::load(Some(Path::new("/nonexistent/aquawatch.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
