//! Configuration management.
//!
//! Handles loading configuration from TOML files and environment variables:
//! the engine endpoint, notification timing, the autocomplete settle timeout,
//! and where the state store lives.

use crate::error::{LaunchError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Environment variable overriding `engine.url`.
pub const ENGINE_URL_ENV: &str = "QUERY_LAUNCH_ENGINE_URL";

/// Environment variable overriding `engine.database`.
pub const DATABASE_ENV: &str = "QUERY_LAUNCH_DATABASE";

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Query engine endpoint.
    #[serde(default)]
    pub engine: EngineConfig,

    /// Toast timing.
    #[serde(default)]
    pub notifications: NotificationConfig,

    /// Autocomplete timing.
    #[serde(default)]
    pub autocomplete: AutocompleteConfig,

    /// Path of the JSON state file. Defaults to the platform config directory.
    pub state_path: Option<PathBuf>,
}

/// Query engine endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// HTTP endpoint of the engine.
    #[serde(default = "default_engine_url")]
    pub url: String,

    /// Database to run queries against, if not the server default.
    pub database: Option<String>,
}

fn default_engine_url() -> String {
    "http://localhost:8123/".to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            url: default_engine_url(),
            database: None,
        }
    }
}

impl EngineConfig {
    /// Applies environment variables as overrides.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var(ENGINE_URL_ENV) {
            self.url = url;
        }
        if let Ok(database) = std::env::var(DATABASE_ENV) {
            self.database = Some(database);
        }
    }

    /// Checks that the URL parses and uses an HTTP scheme.
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.url)
            .map_err(|e| LaunchError::config(format!("Invalid engine URL '{}': {e}", self.url)))?;
        match url.scheme() {
            "http" | "https" => Ok(()),
            other => Err(LaunchError::config(format!(
                "Invalid scheme '{other}'. Expected 'http' or 'https'"
            ))),
        }
    }

    /// Returns a display-safe string (no credentials) for logs.
    pub fn display_string(&self) -> String {
        let host = Url::parse(&self.url)
            .ok()
            .and_then(|u| {
                u.host_str()
                    .map(|h| format!("{h}:{}", u.port_or_known_default().unwrap_or(80)))
            })
            .unwrap_or_else(|| self.url.clone());
        match &self.database {
            Some(db) => format!("{db} @ {host}"),
            None => host,
        }
    }
}

/// Notification timing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Lifetime of transient toasts, in milliseconds.
    #[serde(default = "default_transient_timeout_ms")]
    pub transient_timeout_ms: u64,
}

fn default_transient_timeout_ms() -> u64 {
    5000
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            transient_timeout_ms: default_transient_timeout_ms(),
        }
    }
}

impl NotificationConfig {
    pub fn transient_timeout(&self) -> Duration {
        Duration::from_millis(self.transient_timeout_ms)
    }
}

/// Autocomplete timing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutocompleteConfig {
    /// How long to wait for the catalog producer, in milliseconds.
    #[serde(default = "default_settle_timeout_ms")]
    pub settle_timeout_ms: u64,
}

fn default_settle_timeout_ms() -> u64 {
    5000
}

impl Default for AutocompleteConfig {
    fn default() -> Self {
        Self {
            settle_timeout_ms: default_settle_timeout_ms(),
        }
    }
}

impl AutocompleteConfig {
    pub fn settle_timeout(&self) -> Duration {
        Duration::from_millis(self.settle_timeout_ms)
    }
}

impl Config {
    /// Returns the default config file path for the current platform.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("query-launch")
            .join("config.toml")
    }

    /// Loads configuration from a TOML file. A missing file yields defaults.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| LaunchError::config(format!("Failed to read config file: {e}")))?;

        Self::parse_toml(&content, path)
    }

    /// Parses configuration from a TOML string.
    fn parse_toml(content: &str, path: &Path) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| {
            LaunchError::config(format!(
                "Configuration error in {}:\n  {}",
                path.display(),
                e
            ))
        })?;
        config.engine.validate()?;
        Ok(config)
    }
}
