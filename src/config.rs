//! Client configuration
//!
//! Defaults, then `~/.config/rythmit/config.json` if present, then the
//! `RYTHMIT_API_URL` environment variable.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

/// Backend default `APP_PORT` is 8085.
pub const DEFAULT_API_BASE: &str = "http://localhost:8085";

/// Environment override for the backend base URL.
pub const API_URL_ENV: &str = "RYTHMIT_API_URL";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    /// `None` keeps reqwest's default (no timeout).
    pub request_timeout_secs: Option<u64>,
    /// Sent as the backend's `limit` parameter when set.
    pub result_limit: Option<u32>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE.to_string(),
            request_timeout_secs: None,
            result_limit: None,
        }
    }
}

impl Config {
    /// Location of the config file, if the platform has a config dir.
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("rythmit").join("config.json"))
    }

    /// Load from the default file location and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(
            Self::config_path().as_deref(),
            std::env::var(API_URL_ENV).ok(),
        )
    }

    /// Load from an explicit file and URL override. A missing file is fine.
    pub fn load_from(path: Option<&Path>, url_override: Option<String>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) if path.exists() => {
                let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;
                let config: Config =
                    serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
                        path: path.to_path_buf(),
                        source,
                    })?;
                tracing::debug!("Loaded config from {:?}", path);
                config
            }
            _ => Config::default(),
        };

        if let Some(url) = url_override.filter(|u| !u.trim().is_empty()) {
            config.api_base_url = url.trim().to_string();
        }

        Ok(config)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}
