//! Application configuration management.
//!
//! Configuration is stored at `~/.config/recipecache/config.json`. Every field
//! has a default, so a missing or partial file is fine. `RECIPECACHE_API_BASE`
//! and `RECIPECACHE_DATA_DIR` override the file when set.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::api::client::{DEFAULT_API_BASE_URL, DEFAULT_REQUEST_TIMEOUT_SECS};
use crate::search::pipeline::{DEFAULT_DEBOUNCE_MS, DEFAULT_UX_DELAY_MS};
use crate::search::SearchConfig;

/// Application name used for config/data directory paths
pub const APP_NAME: &str = "recipecache";

/// Config file name
const CONFIG_FILE: &str = "config.json";

const ENV_API_BASE: &str = "RECIPECACHE_API_BASE";
const ENV_DATA_DIR: &str = "RECIPECACHE_DATA_DIR";

/// Category choices offered by the search filter
pub const CATEGORY_OPTIONS: &[&str] = &[
    "All", "Italian", "Indian", "Chinese", "Mexican", "Japanese", "Thai", "French", "American",
];

/// Cuisine choices offered by the search filter
pub const AREA_OPTIONS: &[&str] = &[
    "All", "Italian", "Indian", "Chinese", "Mexican", "Japanese", "Thai", "French", "American",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    pub debounce_ms: u64,
    pub ux_delay_ms: u64,
    pub request_timeout_secs: u64,
    /// Where persisted cache, favorites, history and logs live.
    /// Defaults to the platform cache directory.
    pub data_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            ux_delay_ms: DEFAULT_UX_DELAY_MS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            data_dir: None,
        }
    }
}

impl Config {
    /// Load from the config file, then apply environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Invalid config file {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.data_dir {
            return Ok(dir.clone());
        }
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    /// Apply overrides from `lookup` (the process environment in `load`).
    /// Blank values are ignored.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = non_blank(ENV_API_BASE) {
            self.api_base_url = url.trim().to_string();
        }
        if let Some(dir) = non_blank(ENV_DATA_DIR) {
            self.data_dir = Some(PathBuf::from(dir.trim()));
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn search_config(&self) -> SearchConfig {
        SearchConfig {
            debounce: Duration::from_millis(self.debounce_ms),
            ux_delay: Duration::from_millis(self.ux_delay_ms),
        }
    }
}
