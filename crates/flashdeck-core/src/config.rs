//! Configuration for flashdeck
//!
//! Stored in <config_dir>/flashdeck/config.toml

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "flashdeck";
const CONFIG_FILE: &str = "config.toml";
const DATA_FILE: &str = "storage.json";

/// flashdeck configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Storage file holding all themes, cards and stats
    pub data_file: Option<PathBuf>,

    /// Display settings
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Display configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Use colors in output
    pub colors: bool,

    /// Show per-card success rates in card listings
    pub show_rates: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            colors: true,
            show_rates: true,
        }
    }
}

impl Config {
    /// Default location of the config file
    pub fn default_path() -> crate::Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
            .ok_or_else(|| crate::Error::Config("cannot determine config directory".to_string()))
    }

    /// Load config from a TOML file
    pub fn load(path: &Path) -> crate::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config =
            toml::from_str(&content).map_err(|e| crate::Error::Config(e.to_string()))?;
        Ok(config)
    }

    /// Save config to a TOML file
    pub fn save(&self, path: &Path) -> crate::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::Error::Config(format!("failed to serialize config: {}", e)))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Storage file to open: the configured one, else the platform data dir
    pub fn data_file(&self) -> crate::Result<PathBuf> {
        if let Some(ref path) = self.data_file {
            return Ok(path.clone());
        }
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR).join(DATA_FILE))
            .ok_or_else(|| crate::Error::Config("cannot determine data directory".to_string()))
    }

    /// Generate a default config file with comments
    pub fn default_with_comments() -> String {
        r#"# flashdeck configuration

# Storage file for themes, cards and stats
# (defaults to <data_dir>/flashdeck/storage.json)
# data_file = "/path/to/storage.json"

[display]
# Use colors in output
colors = true

# Show per-card success rates in card listings
show_rates = true
"#
        .to_string()
    }
}
