//! Configuration loading for termbridge.
//!
//! Settings are read from `~/.termbridge/config.toml`; a missing or
//! unreadable file falls back to defaults.
//!
//! # Configuration File
//!
//! ```toml
//! # Strip markup tags the renderer does not recognize
//! hide_unsupported_tags = true
//!
//! # Reject (instead of silently abandoning) input requests left
//! # outstanding when their session is disposed
//! strict_dispose = false
//!
//! # Progress bar animation tick, in milliseconds
//! progress_tick_ms = 50
//! ```

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Strip unrecognized markup tags instead of printing them literally
    pub hide_unsupported_tags: bool,
    /// Reject outstanding requests on dispose instead of abandoning them
    pub strict_dispose: bool,
    /// Progress animation tick interval in milliseconds
    pub progress_tick_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hide_unsupported_tags: true,
            strict_dispose: false,
            progress_tick_ms: 50,
        }
    }
}

impl Config {
    /// Path to the configuration file (`~/.termbridge/config.toml`).
    pub fn config_path() -> Option<PathBuf> {
        let home = std::env::var_os("HOME")
            .or_else(|| std::env::var_os("USERPROFILE"))
            .map(PathBuf::from)?;
        Some(home.join(".termbridge").join("config.toml"))
    }

    /// Load the configuration, falling back to defaults when the file is
    /// missing or malformed.
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };
        match fs::read_to_string(&path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => {
                    debug!(path = %path.display(), "loaded configuration");
                    config
                }
                Err(err) => {
                    debug!(path = %path.display(), %err, "malformed config, using defaults");
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }
}
