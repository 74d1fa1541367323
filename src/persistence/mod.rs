//! # Persistence Module
//!
//! Loads and stores everything padmapper keeps between runs: the application
//! configuration (`config.toml`) and the last imported mapping
//! (see [`mapping_store`]).
//!
//! ## Error Handling Strategy
//! Uses `color_eyre` for file operations. A missing configuration is not an
//! error: defaults are written and used so the application always starts.

pub mod mapping_store;

use color_eyre::eyre::{eyre, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const CONFIG_DIR: &str = ".config/padmapper";
const CONFIG_FILE: &str = "config.toml";

/// Application settings read from `config.toml`.
///
/// Every field has a default, so partial files are accepted.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Period of the controller tick loop
    pub tick_interval_ms: u64,
    /// Mapping loaded at startup when nothing was imported before.
    /// Relative paths are resolved against the working directory.
    pub mapping_file: PathBuf,
    /// Which connected gamepad to read, in connection order
    pub gamepad_index: usize,
    /// Start the window in fullscreen
    pub fullscreen: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 16,
            mapping_file: PathBuf::from("mapping.json"),
            gamepad_index: 0,
            fullscreen: false,
        }
    }
}

impl AppConfig {
    /// Loads `config.toml` from `dir`, writing the defaults first if it is missing
    pub async fn load_or_create(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE);

        if !tokio::fs::try_exists(&path)
            .await
            .map_err(|e| eyre!("Failed to check if config file exists: {}", e))?
        {
            warn!(
                "Config file {} does not exist, creating default",
                path.display()
            );
            let config = Self::default();
            config.save(dir).await?;
            return Ok(config);
        }

        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| eyre!("Failed to read config file: {}", e))?;
        let config: Self =
            toml::from_str(&content).map_err(|e| eyre!("Failed to parse config file: {}", e))?;

        debug!("Loaded config: {:?}", config);
        Ok(config)
    }

    pub async fn save(&self, dir: &Path) -> Result<()> {
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| eyre!("Failed to create config directory: {}", e))?;

        let content = toml::to_string_pretty(self)
            .map_err(|e| eyre!("Failed to serialize config: {}", e))?;
        tokio::fs::write(dir.join(CONFIG_FILE), content)
            .await
            .map_err(|e| eyre!("Failed to write config file: {}", e))?;

        info!("Config saved to {}", dir.display());
        Ok(())
    }
}

/// `~/.config/padmapper`, or `./.config/padmapper` without a home directory
pub fn config_dir() -> PathBuf {
    let mut path = dirs::home_dir().unwrap_or_else(|| {
        warn!("Could not determine home directory, using current directory");
        PathBuf::from(".")
    });
    path.push(CONFIG_DIR);
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn missing_config_is_created_with_defaults() {
        let dir = TempDir::new().unwrap();
        let config_dir = dir.path().join("padmapper");

        let config = AppConfig::load_or_create(&config_dir).await.unwrap();
        assert_eq!(config, AppConfig::default());
        assert!(config_dir.join(CONFIG_FILE).exists());

        let again = AppConfig::load_or_create(&config_dir).await.unwrap();
        assert_eq!(again, config);
    }

    #[tokio::test]
    async fn partial_config_falls_back_per_field() {
        let dir = TempDir::new().unwrap();
        tokio::fs::write(dir.path().join(CONFIG_FILE), "gamepad_index = 2\n")
            .await
            .unwrap();

        let config = AppConfig::load_or_create(dir.path()).await.unwrap();
        assert_eq!(config.gamepad_index, 2);
        assert_eq!(config.tick_interval_ms, 16);
        assert_eq!(config.mapping_file, PathBuf::from("mapping.json"));
    }

    #[tokio::test]
    async fn broken_config_is_an_error() {
        let dir = TempDir::new().unwrap();
        tokio::fs::write(dir.path().join(CONFIG_FILE), "tick_interval_ms = \"fast\"")
            .await
            .unwrap();
        assert!(AppConfig::load_or_create(dir.path()).await.is_err());
    }
}
