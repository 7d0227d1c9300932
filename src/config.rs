//! Client configuration management.
//!
//! This module handles loading and saving the client configuration, which
//! covers the backend base URL and the durable storage directory.
//!
//! Configuration is stored at `~/.config/classhub-client/config.json`.
//! Environment variables `CLASSHUB_BASE_URL` and `CLASSHUB_STORAGE_DIR`
//! override the file (a `.env` file is honored).

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Application name used for config/storage directory paths
const APP_NAME: &str = "classhub-client";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Default backend base URL (local development server)
const DEFAULT_BASE_URL: &str = "http://localhost:8080";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub base_url: String,
    pub storage_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            storage_dir: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load .env file if present (silently ignore if not found)
        let _ = dotenvy::dotenv();

        let path = Self::config_path()?;
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            serde_json::from_str(&contents)?
        } else {
            Self::default()
        };

        if let Ok(base_url) = std::env::var("CLASSHUB_BASE_URL") {
            config.base_url = base_url;
        }
        if let Ok(dir) = std::env::var("CLASSHUB_STORAGE_DIR") {
            config.storage_dir = Some(PathBuf::from(dir));
        }

        Ok(config)
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

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Directory backing the durable storage layer.
    pub fn storage_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.storage_dir {
            return Ok(dir.clone());
        }
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_base_url() {
        let config = Config::default();
        assert_eq!(config.base_url, "http://localhost:8080");
    }

    #[test]
    fn test_explicit_storage_dir_wins() {
        let config = Config {
            base_url: DEFAULT_BASE_URL.to_string(),
            storage_dir: Some(PathBuf::from("/tmp/classhub-test")),
        };
        assert_eq!(
            config.storage_dir().unwrap(),
            PathBuf::from("/tmp/classhub-test")
        );
    }

    // The only test that mutates the process environment; keep it that way
    // so it cannot race with the rest of the suite.
    #[test]
    fn test_env_overrides_apply_on_load() {
        std::env::set_var("CLASSHUB_BASE_URL", "https://classhub.example.edu");
        std::env::set_var("CLASSHUB_STORAGE_DIR", "/tmp/classhub-env-dir");

        let config = Config::load().unwrap();

        std::env::remove_var("CLASSHUB_BASE_URL");
        std::env::remove_var("CLASSHUB_STORAGE_DIR");

        assert_eq!(config.base_url, "https://classhub.example.edu");
        assert_eq!(
            config.storage_dir.as_deref(),
            Some(std::path::Path::new("/tmp/classhub-env-dir"))
        );
        assert_eq!(
            config.storage_dir().unwrap(),
            PathBuf::from("/tmp/classhub-env-dir")
        );
    }

    #[test]
    fn test_config_roundtrips_through_json() {
        let config = Config::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.base_url, config.base_url);
    }
}
