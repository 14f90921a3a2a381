//! Configuration loaded from `~/.config/cinemaos/config.toml`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{ensure, Context, Result};
use serde::Deserialize;

use crate::identity::metadata::DEFAULT_METADATA_URL;
use crate::stream::providers::cinemaos::DEFAULT_PROVIDER_URL;

/// Collaborator endpoints and timeouts.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the stream-source provider.
    pub provider_url: String,
    /// Base URL of the Cinemeta-compatible metadata service.
    pub metadata_url: String,
    /// Total timeout for the stream-source fetch, in seconds (must be > 0)
    pub provider_timeout_secs: u64,
    /// Total timeout for each metadata lookup, in seconds (must be > 0)
    pub metadata_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider_url: DEFAULT_PROVIDER_URL.to_string(),
            metadata_url: DEFAULT_METADATA_URL.to_string(),
            provider_timeout_secs: 60,
            metadata_timeout_secs: 10,
        }
    }
}

impl Config {
    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.provider_timeout_secs)
    }

    pub fn metadata_timeout(&self) -> Duration {
        Duration::from_secs(self.metadata_timeout_secs)
    }

    /// Load from the default location.
    ///
    /// Returns defaults if the file doesn't exist (configuration is optional).
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("invalid TOML in {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("invalid config in {}", path.display()))?;
        Ok(config)
    }

    /// Reject settings that would make every request fail.
    pub fn validate(&self) -> Result<()> {
        ensure!(self.provider_timeout_secs > 0, "provider_timeout_secs must be at least 1");
        ensure!(self.metadata_timeout_secs > 0, "metadata_timeout_secs must be at least 1");
        Ok(())
    }
}

/// Return the path to the config file.
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("cinemaos")
        .join("config.toml")
}
