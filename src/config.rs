//! Configuration management and validation.
//!
//! Provides the damflow configuration structure, TOML file loading and the
//! platform default locations for the reading log and the config file.

use crate::constants::{APP_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_FLOW_FACTOR, DEFAULT_LOG_FILE_NAME};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default reading log path following platform conventions.
///
/// - Linux: `~/.local/share/damflow/water_flow_data.csv`
/// - macOS: `~/Library/Application Support/damflow/water_flow_data.csv`
/// - Windows: `C:\Users\<user>\AppData\Local\damflow\water_flow_data.csv`
pub fn default_log_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
        .join(DEFAULT_LOG_FILE_NAME)
}

/// Default config file path (`<config dir>/damflow/config.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Global configuration for damflow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DamFlowConfig {
    /// Path to the CSV reading log
    pub data_path: PathBuf,

    /// Calibration factor for the level-difference flow estimator
    pub flow_factor: f64,
}

impl Default for DamFlowConfig {
    fn default() -> Self {
        Self {
            data_path: default_log_path(),
            flow_factor: DEFAULT_FLOW_FACTOR,
        }
    }
}

impl DamFlowConfig {
    /// Parse configuration from TOML text; missing keys take defaults
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)
            .map_err(|e| Error::configuration(format!("Invalid configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Read configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            Error::io(format!("Failed to read config file {}", path.display()), e)
        })?;
        debug!("Loaded configuration from {}", path.display());
        Self::from_toml_str(&text)
    }

    /// Resolve configuration
    ///
    /// An explicit path must exist. Otherwise the default config file is used
    /// when present, and built-in defaults when it is not.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(Error::configuration(format!(
                    "Config file does not exist: {}",
                    path.display()
                )));
            }
            return Self::from_file(path);
        }

        match default_config_path().filter(|path| path.exists()) {
            Some(path) => Self::from_file(&path),
            None => {
                debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Set the reading log path
    pub fn with_data_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_path = path.into();
        self
    }

    /// Set the flow estimator factor
    pub fn with_flow_factor(mut self, factor: f64) -> Self {
        self.flow_factor = factor;
        self
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if !self.flow_factor.is_finite() || self.flow_factor <= 0.0 {
            return Err(Error::configuration(format!(
                "flow_factor must be a positive finite number, got {}",
                self.flow_factor
            )));
        }

        if self.data_path.as_os_str().is_empty() {
            return Err(Error::configuration("data_path cannot be empty"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_valid() {
        let config = DamFlowConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.flow_factor, DEFAULT_FLOW_FACTOR);
        assert!(config.data_path.ends_with("damflow/water_flow_data.csv"));
    }

    #[test]
    fn test_from_toml_partial() {
        let config = DamFlowConfig::from_toml_str("flow_factor = 1.2\n").unwrap();
        assert_eq!(config.flow_factor, 1.2);
        assert_eq!(config.data_path, default_log_path());
    }

    #[test]
    fn test_from_toml_rejects_bad_values() {
        assert!(DamFlowConfig::from_toml_str("flow_factor = -3.0").is_err());
        assert!(DamFlowConfig::from_toml_str("flow_factor = \"fast\"").is_err());
    }

    #[test]
    fn test_load_explicit_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "data_path = \"/srv/dams/log.csv\"\nflow_factor = 0.9\n").unwrap();

        let config = DamFlowConfig::load(Some(&path)).unwrap();
        assert_eq!(config.data_path, PathBuf::from("/srv/dams/log.csv"));
        assert_eq!(config.flow_factor, 0.9);
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let temp_dir = TempDir::new().unwrap();
        let result = DamFlowConfig::load(Some(&temp_dir.path().join("absent.toml")));
        assert!(matches!(result, Err(Error::Configuration { .. })));
    }

    #[test]
    fn test_builder_overrides() {
        let config = DamFlowConfig::default()
            .with_data_path("/tmp/log.csv")
            .with_flow_factor(2.0);
        assert_eq!(config.data_path, PathBuf::from("/tmp/log.csv"));
        assert_eq!(config.flow_factor, 2.0);
    }
}
