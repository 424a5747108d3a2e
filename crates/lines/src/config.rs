// Chunk: docs/chunks/document_config - Per-document configuration

//! Configuration for a [`Document`](crate::Document).
//!
//! Stored as JSON. Every field has a default, so a partial file (or none at
//! all) is valid.
//!
//! ## File Location
//!
//! [`DocumentConfig::load_default`] reads `<config dir>/perline/config.json`,
//! e.g. `~/.config/perline/config.json` on Linux.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::line_breaks::LineEnding;

/// Application name used for the config directory.
const APP_NAME: &str = "perline";

/// Config file name.
const CONFIG_FILENAME: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentConfig {
    /// Which byte sequences end a line.
    pub line_ending: LineEnding,
    /// Separator used when persisting fold state.
    pub fold_separator: String,
    /// Compare the incremental index against a full rescan every this many
    /// edits; 0 disables the check.
    pub consistency_check_interval: u64,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            line_ending: LineEnding::default(),
            fold_separator: ";".to_string(),
            consistency_check_interval: if cfg!(debug_assertions) { 64 } else { 0 },
        }
    }
}

impl DocumentConfig {
    /// Parses a config from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON or unknown enum values.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads a config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read and
    /// [`ConfigError::Parse`] if it is not valid config JSON.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config = Self::from_json_str(&contents)?;
        tracing::debug!(path = %path.display(), ?config, "loaded document config");
        Ok(config)
    }

    /// Loads the user's config file, falling back to defaults when there is
    /// no config directory or no file in it.
    ///
    /// # Errors
    ///
    /// An existing file that cannot be read or parsed is still an error.
    pub fn load_default() -> Result<Self, ConfigError> {
        match config_file_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Serializes the config as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Propagates serializer failures as [`ConfigError::Parse`].
    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Returns the path of the user's config file, if a config directory exists.
pub fn config_file_path() -> Option<PathBuf> {
    let config_dir = dirs::config_dir()?;
    Some(config_dir.join(APP_NAME).join(CONFIG_FILENAME))
}
