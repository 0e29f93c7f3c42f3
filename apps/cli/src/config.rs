//! CLI configuration

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// CLI configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path of the JSON store document
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_store_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("bloodbank")
        .join("store.json")
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
            log_level: default_log_level(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment and optional config file
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let file_contents = match Self::find_config_file() {
            Some(path) => Some(std::fs::read_to_string(path)?),
            None => None,
        };

        Self::from_sources(|key| std::env::var(key).ok(), file_contents.as_deref())
    }

    /// Builds the configuration from an environment lookup and the contents
    /// of a config file. Environment variables win over the file.
    pub fn from_sources(
        env: impl Fn(&str) -> Option<String>,
        file_contents: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let mut config = match file_contents {
            Some(contents) => toml::from_str::<AppConfig>(contents)?,
            None => Self::default(),
        };

        if let Some(path) = env("BLOODBANK_STORE_PATH") {
            config.store_path = PathBuf::from(path);
        }

        if let Some(level) = env("BLOODBANK_LOG_LEVEL") {
            config.log_level = level;
        }

        config.validate()?;
        Ok(config)
    }

    /// Replaces the store path, e.g. from `--store`.
    pub fn with_store_path(mut self, path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        self.store_path = path.as_ref().to_path_buf();
        self.validate()?;
        Ok(self)
    }

    /// Find the config file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        let locations = [
            PathBuf::from("bloodbank.toml"),
            dirs::config_dir()
                .map(|p| p.join("bloodbank").join("config.toml"))
                .unwrap_or_default(),
        ];

        locations.into_iter().find(|p| p.is_file())
    }

    /// Validate the configuration
    fn validate(&self) -> Result<(), ConfigError> {
        if self.store_path.as_os_str().is_empty() {
            return Err(ConfigError::EmptyStorePath);
        }

        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Store path must not be empty")]
    EmptyStorePath,

    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}
