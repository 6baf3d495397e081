use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const API_URL_ENV: &str = "REPOCHAT_API_URL";
const DEFAULT_TICK_RATE_MS: u64 = 250;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Config {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_tick_rate_ms() -> u64 {
    DEFAULT_TICK_RATE_MS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            timeout_secs: None,
            tick_rate_ms: DEFAULT_TICK_RATE_MS,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from the user config directory, falling back to defaults when
    /// the file doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create config directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Apply `REPOCHAT_API_URL` and then an explicit override (CLI flag).
    pub fn with_overrides(mut self, env_url: Option<String>, cli_url: Option<String>) -> Self {
        if let Some(url) = env_url.filter(|u| !u.trim().is_empty()) {
            self.api_url = url;
        }
        if let Some(url) = cli_url.filter(|u| !u.trim().is_empty()) {
            self.api_url = url;
        }
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms.max(1))
    }

    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("repochat"))
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }
}
