//! Persisted configuration.
//!
//! The config file is a small JSON document:
//!
//! ```json
//! { "saves": "/home/me/.local/share/TUNIC/SAVES", "poll_interval_ms": 1000 }
//! ```
//!
//! Only `saves` is required. The file lives in the platform config
//! directory unless a path is given explicitly:
//!
//! - **Linux**: `~/.config/savewarden/config.json`
//! - **macOS**: `~/Library/Application Support/savewarden/config.json`
//! - **Windows**: `%APPDATA%\savewarden\config.json`
//!
//! `SAVEWARDEN_CONFIG_DIR` overrides the directory.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::error::ConfigError;

/// Application name used for the config directory.
pub const APP_NAME: &str = "savewarden";

/// Config file name inside the config directory.
pub const CONFIG_FILE: &str = "config.json";

/// Environment variable overriding the config directory.
pub const CONFIG_DIR_ENV: &str = "SAVEWARDEN_CONFIG_DIR";

/// Delay between two polls unless configured otherwise.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Savewarden configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WardenConfig {
    /// Directory holding the save files.
    pub saves: PathBuf,

    /// Delay between polls, in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL.as_millis() as u64
}

impl WardenConfig {
    pub fn new(saves: impl Into<PathBuf>) -> Self {
        Self {
            saves: saves.into(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }

    /// Builder: set the poll interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval_ms = interval.as_millis() as u64;
        self
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Reject settings the watcher cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.saves.as_os_str().is_empty() {
            return Err(ConfigError::MissingSaves);
        }
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::InvalidInterval);
        }
        Ok(())
    }

    /// Load and validate the config at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let body = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&body).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        debug!(path = %path.display(), saves = %config.saves.display(), "loaded config");
        Ok(config)
    }

    /// Like [`WardenConfig::load`], but `Ok(None)` when the file does not exist.
    pub fn load_if_exists(path: &Path) -> Result<Option<Self>, ConfigError> {
        match Self::load(path) {
            Ok(config) => Ok(Some(config)),
            Err(ConfigError::Io { source, .. })
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Write the config to `path`, replacing any previous file atomically.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        self.validate()?;
        let io_err = |source: std::io::Error| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };

        let payload = serde_json::to_vec_pretty(self).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&parent).map_err(io_err)?;

        // Temp file in the same directory so the rename stays on one filesystem.
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(CONFIG_FILE);
        let temp_path = parent.join(format!(".{}.tmp.{}", file_name, std::process::id()));
        {
            let mut file = fs::File::create(&temp_path).map_err(io_err)?;
            file.write_all(&payload).map_err(io_err)?;
            file.write_all(b"\n").map_err(io_err)?;
            file.sync_all().map_err(io_err)?;
        }
        if let Err(e) = fs::rename(&temp_path, path) {
            let _ = fs::remove_file(&temp_path);
            return Err(io_err(e));
        }

        debug!(path = %path.display(), "saved config");
        Ok(())
    }
}

/// The savewarden config directory.
pub fn savewarden_config_dir() -> Result<PathBuf, ConfigError> {
    if let Ok(val) = std::env::var(CONFIG_DIR_ENV) {
        if !val.is_empty() {
            let path = PathBuf::from(val);
            debug!(path = %path.display(), "Using SAVEWARDEN_CONFIG_DIR override");
            return Ok(path);
        }
    }

    let base = dirs::config_dir().ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(base.join(APP_NAME))
}

/// Default location of the config file.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    Ok(savewarden_config_dir()?.join(CONFIG_FILE))
}
