//! Configuration management for the GeoCrop command line tool
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (config/development.toml, config/production.toml)
//! 3. Environment variable overrides with GEOCROP_ prefix

use std::path::PathBuf;

use config::{ConfigError, Environment, File};
use serde::Deserialize;
use shared::history::{HistoryConfig, MAX_ENTRIES};
use shared::storage::keys;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Local data file configuration
    pub storage: StorageConfig,

    /// Prediction history configuration
    pub history: HistorySettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// JSON file holding every stored key
    pub data_file: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HistorySettings {
    /// Maximum saved predictions before the oldest are dropped
    pub max_entries: usize,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("GEOCROP_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            .set_default("environment", environment.clone())?
            .set_default("storage.data_file", "geocrop-data.json")?
            .set_default("history.max_entries", MAX_ENTRIES as i64)?
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            .add_source(
                Environment::with_prefix("GEOCROP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Settings for the shared prediction history store
    pub fn history_config(&self) -> HistoryConfig {
        HistoryConfig {
            key: keys::PREDICTION_HISTORY.to_string(),
            max_entries: self.history.max_entries.max(1),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            storage: StorageConfig {
                data_file: PathBuf::from("geocrop-data.json"),
            },
            history: HistorySettings {
                max_entries: MAX_ENTRIES,
            },
        }
    }
}
