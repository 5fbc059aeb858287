use serde::{Deserialize, Serialize};
use std::{
    fs::{read_to_string, write},
    path::{Path, PathBuf},
};

use crate::error::Error;

/// Base URL of the public counting-schemes API.
pub const DEFAULT_API_BASE_URL: &str = "https://api.hawsabah.org/QRDBAPI/";

const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    pub request_timeout_ms: u64,
    /// Directory for the file-backed statistics cache. `None` disables it.
    pub cache_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            cache_dir: None,
        }
    }
}

impl Config {
    /// Read a TOML config file; a missing file yields the defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Config, Error> {
        tracing::debug!("Attempting to read config from {:?}", path.as_ref());
        if !path.as_ref().exists() {
            tracing::debug!("Config file not found, using defaults");
            return Ok(Config::default());
        }
        let content = read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        tracing::debug!("Writing config to {:?}", path.as_ref());
        write(path, toml::to_string(self)?)?;
        Ok(())
    }
}
