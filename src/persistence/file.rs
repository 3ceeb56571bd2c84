//! JSON file-backed key-value store.
//!
//! The whole store is a single JSON object of string values. It is read on
//! open and rewritten on every `set`, which is fine for the handful of keys
//! the pane keeps.

use super::PersistencePort;
use crate::error::{LaunchError, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{info, warn};

/// A store persisted as a JSON object on disk.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    values: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Returns the default state file path for the current platform.
    ///
    /// - Linux: `~/.config/query-launch/state.json`
    /// - Windows: `%APPDATA%\query-launch\state.json`
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| LaunchError::persistence("Could not determine config directory"))?;
        Ok(config_dir.join("query-launch").join("state.json"))
    }

    /// Opens the store at `path`, creating parent directories as needed.
    ///
    /// A missing file yields an empty store. A file that is not a JSON object
    /// of strings is an error rather than being silently discarded.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                LaunchError::persistence(format!(
                    "Failed to create state directory {}: {e}",
                    parent.display()
                ))
            })?;
        }

        let values = if path.exists() {
            let content = std::fs::read_to_string(path).map_err(|e| {
                LaunchError::persistence(format!("Failed to read {}: {e}", path.display()))
            })?;
            if content.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&content).map_err(|e| {
                    LaunchError::persistence(format!(
                        "State file {} is not a JSON object of strings: {e}",
                        path.display()
                    ))
                })?
            }
        } else {
            BTreeMap::new()
        };

        info!("State store opened at {}", path.display());
        Ok(Self {
            path: path.to_path_buf(),
            values: Mutex::new(values),
        })
    }

    /// Returns the path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, values: &BTreeMap<String, String>) -> Result<()> {
        let content = serde_json::to_string_pretty(values)
            .map_err(|e| LaunchError::persistence(format!("Failed to encode state: {e}")))?;
        std::fs::write(&self.path, content).map_err(|e| {
            warn!("Failed to write state file {}: {e}", self.path.display());
            LaunchError::persistence(format!("Failed to write {}: {e}", self.path.display()))
        })
    }
}

impl PersistencePort for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let values = self
            .values
            .lock()
            .map_err(|_| LaunchError::internal("file store lock poisoned"))?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| LaunchError::internal("file store lock poisoned"))?;
        values.insert(key.to_string(), value.to_string());
        self.flush(&values)
    }
}
