//! TOML configuration for the storefront service.
//!
//! Every section and every field has a default, so an empty file (or no file at
//! all) yields a working configuration.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Top-level configuration, parsed from TOML.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerSection,
    pub store: StoreSection,
    pub api: ApiSection,
    pub log: LogSection,
}

/// `[server]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    /// Address the HTTP API binds to.
    pub listen_addr: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:5000".to_string(),
        }
    }
}

/// `[store]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreSection {
    /// Requests that may queue in front of the store actor before senders wait.
    pub channel_capacity: usize,
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            channel_capacity: 64,
        }
    }
}

/// `[api]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiSection {
    /// `per_page` used when a list request omits it.
    pub default_per_page: usize,
    /// Upper bound applied to any requested `per_page`.
    pub max_per_page: usize,
}

impl Default for ApiSection {
    fn default() -> Self {
        Self {
            default_per_page: 10,
            max_per_page: 100,
        }
    }
}

/// `[log]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogSection {
    /// Log level filter (e.g. `"info"`, `"debug"`). `RUST_LOG` takes precedence.
    pub level: String,
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load config from a TOML file, or return the defaults if no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => {
                let content = std::fs::read_to_string(p).map_err(|source| ConfigError::Io {
                    path: p.to_path_buf(),
                    source,
                })?;
                Self::from_toml(&content)
            }
            None => Ok(Self::default()),
        }
    }

    /// Parse and validate config from a TOML string.
    pub fn from_toml(s: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.store.channel_capacity == 0 {
            return Err(ConfigError::Invalid(
                "store.channel_capacity must be at least 1".into(),
            ));
        }
        if self.api.default_per_page == 0 || self.api.max_per_page == 0 {
            return Err(ConfigError::Invalid(
                "api page sizes must be at least 1".into(),
            ));
        }
        if self.api.default_per_page > self.api.max_per_page {
            return Err(ConfigError::Invalid(format!(
                "api.default_per_page ({}) exceeds api.max_per_page ({})",
                self.api.default_per_page, self.api.max_per_page
            )));
        }
        Ok(())
    }
}
