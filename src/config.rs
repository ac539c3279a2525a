//! Configuration loading
//!
//! Precedence (lowest to highest):
//! 1. Programmatic defaults
//! 2. YAML file (`skincache.yaml`, or the path given on the command line)
//! 3. Environment variables (`SKINCACHE_*`, nested keys split on `__`)

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::locale::Messages;

/// Default config file, relative to the working directory
pub const DEFAULT_CONFIG_FILE: &str = "skincache.yaml";

const PROFILE_API_URL: &str = "https://api.mojang.com/users/profiles/minecraft";
const SESSION_API_URL: &str = "https://sessionserver.mojang.com/session/minecraft/profile";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Data directory cannot be empty")]
    EmptyDataDir,

    #[error("Provider URL cannot be empty: {0}")]
    EmptyUrl(&'static str),

    #[error("Invalid provider timeout: {0}. Must be at least 1 second")]
    InvalidTimeout(u64),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),
}

/// Upstream provider settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub profile_url: String,
    pub session_url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            profile_url: PROFILE_API_URL.to_string(),
            session_url: SESSION_API_URL.to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding `cache.json`
    pub data_dir: PathBuf,
    /// Resolved records older than this are fetched again
    pub refresh_after_secs: u64,
    pub log_level: String,
    pub provider: ProviderConfig,
    pub messages: Messages,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs::data_dir()
            .map(|dir| dir.join("skincache"))
            .unwrap_or_else(|| PathBuf::from("skincache"));

        Self {
            data_dir,
            refresh_after_secs: 3 * 60 * 60,
            log_level: "info".to_string(),
            provider: ProviderConfig::default(),
            messages: Messages::default(),
        }
    }
}

impl Config {
    /// Load configuration from defaults, the YAML file and the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path))
            .merge(Env::prefixed("SKINCACHE_").split("__"));

        Self::from_figment(figment)
            .with_context(|| format!("Failed to load config from {}", path.display()))
    }

    /// Extract and validate a configuration from any figment
    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: Config = figment
            .extract()
            .context("Failed to extract configuration from figment")?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(ConfigError::EmptyDataDir);
        }
        if self.provider.profile_url.is_empty() {
            return Err(ConfigError::EmptyUrl("profile_url"));
        }
        if self.provider.session_url.is_empty() {
            return Err(ConfigError::EmptyUrl("session_url"));
        }
        if self.provider.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout(self.provider.timeout_secs));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.log_level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(self.log_level.clone()));
        }

        Ok(())
    }
}
