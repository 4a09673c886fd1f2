//! Application configuration management.
//!
//! This module handles loading and saving the client configuration, which
//! currently holds the API base URL. The base URL can also be supplied via
//! the `EXPENSE_TRACKER_API_BASE` environment variable (or a `.env` file),
//! which takes precedence over the config file.
//!
//! Configuration is stored at `~/.config/expense-tracker/config.json`.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Application name used for config/data directory paths
const APP_NAME: &str = "expense-tracker";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Environment variable overriding the API base URL
const API_BASE_ENV: &str = "EXPENSE_TRACKER_API_BASE";

/// Default API base URL for local development
const DEFAULT_API_BASE: &str = "http://localhost:3001/api";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub api_base_url: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load .env if present so the env override can come from a file
        let _ = dotenvy::dotenv();

        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Resolve the API base URL: environment override first, then the
    /// config file, then the local-development default. Trailing slashes
    /// are trimmed so endpoint paths can be appended verbatim.
    pub fn api_base_url(&self) -> String {
        std::env::var(API_BASE_ENV)
            .ok()
            .filter(|value| !value.is_empty())
            .or_else(|| self.api_base_url.clone())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
            .trim_end_matches('/')
            .to_string()
    }

    /// Directory where session tokens persist across restarts.
    pub fn data_dir(&self) -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_from_config_file_trims_trailing_slash() {
        let config = Config {
            api_base_url: Some("https://api.example.com/v1/".to_string()),
        };
        assert_eq!(config.api_base_url(), "https://api.example.com/v1");
    }

    #[test]
    fn test_base_url_defaults_for_local_development() {
        // Only meaningful when the override env var is unset, which is the
        // normal test environment.
        if std::env::var(API_BASE_ENV).is_err() {
            let config = Config::default();
            assert_eq!(config.api_base_url(), DEFAULT_API_BASE);
        }
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config {
            api_base_url: Some("http://10.0.0.2:8000/api".to_string()),
        };
        let json = serde_json::to_string(&config).unwrap();
        let parsed: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.api_base_url.as_deref(), Some("http://10.0.0.2:8000/api"));
    }
}
