use crate::errors::{TweeterError, TweeterResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Name used for the config and data directories
pub const APP_NAME: &str = "mini-tweeter";

const DEFAULT_API_URL: &str = "http://localhost:8000";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Configuration for the API gateway and session storage
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ClientConfig {
    pub api_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub with_credentials: Option<bool>,
    pub storage_dir: Option<PathBuf>,
    pub log_level: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: Some(DEFAULT_API_URL.to_string()),
            timeout_secs: Some(DEFAULT_TIMEOUT_SECS),
            with_credentials: Some(true),
            storage_dir: None,
            log_level: Some("warn".to_string()),
        }
    }
}

impl ClientConfig {
    /// Loads configuration from a file if it exists, otherwise returns the default config
    pub fn load_from_file(path: &Path) -> TweeterResult<Self> {
        if path.exists() {
            let content = fs::read_to_string(path).map_err(|e| {
                TweeterError::ConfigError(format!("Failed to read config file: {}", e))
            })?;

            let config: Self = toml::from_str(&content).map_err(|e| {
                TweeterError::ConfigError(format!("Failed to parse config file: {}", e))
            })?;

            Ok(Self::default().merge(&config))
        } else {
            Ok(Self::default())
        }
    }

    /// Saves configuration to a file
    pub fn save_to_file(&self, path: &Path) -> TweeterResult<()> {
        let content = toml::to_string(self).map_err(|e| {
            TweeterError::ConfigError(format!("Failed to serialize config: {}", e))
        })?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                TweeterError::ConfigError(format!("Failed to create config directory: {}", e))
            })?;
        }

        fs::write(path, content).map_err(|e| {
            TweeterError::ConfigError(format!("Failed to write config file: {}", e))
        })?;

        Ok(())
    }

    /// Merges this config with another config, preferring values from the other config if present
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            api_url: other.api_url.clone().or_else(|| self.api_url.clone()),
            timeout_secs: other.timeout_secs.or(self.timeout_secs),
            with_credentials: other.with_credentials.or(self.with_credentials),
            storage_dir: other
                .storage_dir
                .clone()
                .or_else(|| self.storage_dir.clone()),
            log_level: other.log_level.clone().or_else(|| self.log_level.clone()),
        }
    }

    pub fn api_url(&self) -> &str {
        self.api_url.as_deref().unwrap_or(DEFAULT_API_URL)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_credentials(&self) -> bool {
        self.with_credentials.unwrap_or(true)
    }

    /// Directory holding the persisted session, falling back to the platform data dir
    pub fn resolve_storage_dir(&self) -> TweeterResult<PathBuf> {
        if let Some(dir) = &self.storage_dir {
            return Ok(dir.clone());
        }
        let data_dir = dirs::data_local_dir().ok_or_else(|| {
            TweeterError::ConfigError("Could not determine local data directory".to_string())
        })?;
        Ok(data_dir.join(APP_NAME))
    }
}

/// Helper function to get default config directory
pub fn get_default_config_dir() -> TweeterResult<PathBuf> {
    let home_dir = dirs::home_dir().ok_or_else(|| {
        TweeterError::ConfigError("Could not determine home directory".to_string())
    })?;

    Ok(home_dir.join(".config").join(APP_NAME))
}

/// Helper function to get default config file path
pub fn get_default_config_file() -> TweeterResult<PathBuf> {
    let config_dir = get_default_config_dir()?;
    Ok(config_dir.join("config.toml"))
}
