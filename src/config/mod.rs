//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

use crate::draw::DrawConfig;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Draw search tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrawSettings {
    /// Candidate opponents considered per team before backtracking
    #[serde(default = "default_search_window")]
    pub search_window: usize,

    /// Candidate pairings examined before the search gives up
    #[serde(default = "default_search_budget")]
    pub search_budget: u32,
}

fn default_search_window() -> usize {
    6
}

fn default_search_budget() -> u32 {
    10_000
}

impl Default for DrawSettings {
    fn default() -> Self {
        Self {
            search_window: default_search_window(),
            search_budget: default_search_budget(),
        }
    }
}

impl From<&DrawSettings> for DrawConfig {
    fn from(settings: &DrawSettings) -> Self {
        Self {
            search_window: settings.search_window,
            search_budget: settings.search_budget,
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origin() -> String {
    "*".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub draw: DrawSettings,

    #[serde(default)]
    pub server: ServerConfig,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            draw: DrawSettings::default(),
            server: ServerConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &PathBuf) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.draw.search_window == 0 {
            return Err(ConfigError::ValidationError(
                "Draw search window must be greater than 0".to_string(),
            ));
        }

        if self.draw.search_budget == 0 {
            return Err(ConfigError::ValidationError(
                "Draw search budget must be greater than 0".to_string(),
            ));
        }

        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.data_dir, PathBuf::from("./data"));
        assert_eq!(config.log_level, "info");
        assert_eq!(config.draw.search_window, 6);
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_draw_settings_convert() {
        let settings = DrawSettings {
            search_window: 4,
            search_budget: 500,
        };
        let draw_config = DrawConfig::from(&settings);
        assert_eq!(draw_config.search_window, 4);
        assert_eq!(draw_config.search_budget, 500);
    }

    #[test]
    fn test_config_validation_ok() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_bad_budget() {
        let mut config = AppConfig::default();
        config.draw.search_budget = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_bad_port() {
        let mut config = AppConfig::default();
        config.server.port = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml_str = toml::to_string(&config).unwrap();

        // Should be parseable
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config.data_dir, parsed.data_dir);
        assert_eq!(config.draw.search_budget, parsed.draw.search_budget);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let parsed: AppConfig = toml::from_str("log_level = \"debug\"").unwrap();
        assert_eq!(parsed.log_level, "debug");
        assert_eq!(parsed.draw.search_window, 6);
        assert_eq!(parsed.server.host, "127.0.0.1");
    }
}
