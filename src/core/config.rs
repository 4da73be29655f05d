use crate::core::periods::Preset;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

fn default_data_path() -> String {
    "data/Broker_Daily_Data.csv".to_string()
}

fn default_preset() -> String {
    Preset::LastClosedWeek.label().to_string()
}

fn default_top_n() -> usize {
    5
}

fn default_fill() -> bool {
    true
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default = "default_data_path")]
    pub data_path: String,
    #[serde(default = "default_preset")]
    pub default_preset: String,
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    #[serde(default = "default_fill")]
    pub fill_business_days: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            data_path: default_data_path(),
            default_preset: default_preset(),
            top_n: default_top_n(),
            fill_business_days: default_fill(),
        }
    }
}

impl AppConfig {
    /// Loads the config from the default location, or defaults when no file
    /// has been set up yet.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(path = %config_path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "brokerscope", "brokerscope")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn preset(&self) -> Result<Preset> {
        self.default_preset
            .parse()
            .with_context(|| format!("Invalid default_preset in config: {}", self.default_preset))
    }
}
