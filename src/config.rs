//! Configuration loading and management.
//!
//! Configuration is loaded with the following precedence:
//! 1. Explicit config file (`--config`)
//! 2. Default config file (`<config_dir>/palantir-chat/config.toml`)
//! 3. Defaults

use crate::error::{Error, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Default directory holding the chat file and backups.
const DEFAULT_ROOT: &str = "./backups";

/// Default chat file name.
const DEFAULT_FILE_NAME: &str = "chat.json";

/// Main configuration struct.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Chat file location.
    pub storage: StorageConfig,

    /// Backup export location.
    pub backup: BackupConfig,
}

/// Storage configuration.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory containing the chat file.
    pub root: PathBuf,

    /// Name of the chat file inside `root`.
    pub file_name: String,
}

impl StorageConfig {
    /// Storage rooted at `root` with the default file name.
    #[must_use]
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// Full path of the chat file.
    #[must_use]
    pub fn file_path(&self) -> PathBuf {
        self.root.join(&self.file_name)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from(DEFAULT_ROOT),
            file_name: DEFAULT_FILE_NAME.to_string(),
        }
    }
}

/// Backup configuration.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BackupConfig {
    /// Directory that exported backups are written to.
    pub dir: PathBuf,
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_ROOT),
        }
    }
}

/// Load configuration from `path`, or from the default location.
///
/// A missing default config file yields defaults; a missing explicit one
/// is an error.
///
/// # Errors
///
/// Returns an error if the config file cannot be read or parsed.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let config_path = match path {
        Some(p) => p.to_path_buf(),
        None => match default_config_path() {
            Some(p) if p.exists() => p,
            _ => return Ok(Config::default()),
        },
    };

    let contents = fs::read_to_string(&config_path).map_err(Error::Storage)?;
    parse_config(&contents)
}

/// Parse a TOML config document.
///
/// # Errors
///
/// Returns an error if the document is not valid TOML for [`Config`].
pub fn parse_config(contents: &str) -> Result<Config> {
    toml::from_str(contents).map_err(|e| Error::Config(e.to_string()))
}

/// Get the path to the default config file.
fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("palantir-chat").join("config.toml"))
}
