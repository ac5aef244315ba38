//! Centralized configuration management for formgrid

use std::path::PathBuf;
use std::time::Duration;
use anyhow::{Result, Context};

use crate::tui::components::{InputSize, InputVariant};

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Data file (CSV or JSON) shown in the table; sample users when unset
    pub data_path: Option<PathBuf>,
    /// Logging configuration
    pub logging: LogConfig,
    /// Interval between UI ticks (spinner animation) in milliseconds
    pub tick_rate_ms: u64,
    /// Initial look of the demo input fields
    pub input_variant: InputVariant,
    pub input_size: InputSize,
}

/// Log file location
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub directory: PathBuf,
    pub file_name: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            file_name: "formgrid.log".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: None,
            logging: LogConfig::default(),
            tick_rate_ms: 100,
            input_variant: InputVariant::default(),
            input_size: InputSize::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables and defaults
    pub fn from_env() -> Result<Self> {
        let defaults = Config::default();

        let data_path = std::env::var("FORMGRID_DATA_PATH").ok().map(PathBuf::from);

        let logging = LogConfig {
            directory: std::env::var("FORMGRID_LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.logging.directory),
            file_name: std::env::var("FORMGRID_LOG_FILE")
                .unwrap_or(defaults.logging.file_name),
        };

        Ok(Config {
            data_path,
            logging,
            tick_rate_ms: parse_env_var("FORMGRID_TICK_RATE_MS")?.unwrap_or(defaults.tick_rate_ms),
            input_variant: parse_env_var("FORMGRID_INPUT_VARIANT")?.unwrap_or(defaults.input_variant),
            input_size: parse_env_var("FORMGRID_INPUT_SIZE")?.unwrap_or(defaults.input_size),
        })
    }

    /// Use a data file given on the command line instead of the environment
    pub fn with_data_path(mut self, path: Option<PathBuf>) -> Self {
        if path.is_some() {
            self.data_path = path;
        }
        self
    }

    /// Get tick rate as Duration
    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.tick_rate_ms == 0 {
            return Err(anyhow::anyhow!("Tick rate must be greater than zero"));
        }

        if let Some(path) = &self.data_path {
            if !path.is_file() {
                return Err(anyhow::anyhow!("Data file does not exist: {}", path.display()));
            }
        }

        std::fs::create_dir_all(&self.logging.directory).with_context(|| {
            format!("Cannot create log directory: {}", self.logging.directory.display())
        })?;

        Ok(())
    }
}

/// Helper function to parse environment variable as a specific type
fn parse_env_var<T>(var_name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display + Send + Sync + std::error::Error + 'static,
{
    match std::env::var(var_name) {
        Ok(val) => val.parse().map(Some).with_context(|| {
            format!("Failed to parse environment variable {} = '{}'", var_name, val)
        }),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert!(config.data_path.is_none());
        assert_eq!(config.logging.file_name, "formgrid.log");
        assert_eq!(config.tick_rate(), Duration::from_millis(100));
        assert_eq!(config.input_variant, InputVariant::Outlined);
        assert_eq!(config.input_size, InputSize::Md);
    }

    #[test]
    fn test_config_validation() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.logging.directory = dir.path().join("logs");
        config.validate().unwrap();
        assert!(config.logging.directory.is_dir());

        config.tick_rate_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_rejects_missing_data_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default().with_data_path(Some(dir.path().join("nope.csv")));
        config.logging.directory = dir.path().to_path_buf();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_with_data_path_keeps_existing_when_none() {
        let config = Config {
            data_path: Some(PathBuf::from("users.csv")),
            ..Config::default()
        };
        let config = config.with_data_path(None);
        assert_eq!(config.data_path, Some(PathBuf::from("users.csv")));
    }
}
