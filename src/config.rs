//! Driver configuration.
//!
//! Stored as JSON in the user config directory. Every field has a default, so
//! a missing file or a partial file is fine.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::device::transport::READ_TIMEOUT_MS;
use crate::error::{KrakenError, Result};

// =============================================================================
// Config Path
// =============================================================================

const APP_NAME: &str = "nzxt-kraken3";
const CONFIG_FILE: &str = "config.json";

/// Get the configuration directory path.
/// - Linux: ~/.config/nzxt-kraken3/
/// - Windows: %APPDATA%\nzxt-kraken3\
pub fn get_config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|p| p.join(APP_NAME))
        .ok_or_else(|| KrakenError::Config("Could not find config directory".into()))
}

/// Get the full path to the config file.
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join(CONFIG_FILE))
}

// =============================================================================
// DriverConfig
// =============================================================================

/// Settings for the CLI host and the hidapi transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Seconds between poll cycles in `monitor`.
    pub poll_interval_secs: u64,

    /// HID read timeout in milliseconds.
    pub read_timeout_ms: i32,

    /// Default `tracing` filter when `RUST_LOG` is unset.
    pub log_level: String,

    /// Preferred device serial when several coolers are connected.
    pub serial: Option<String>,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 2,
            read_timeout_ms: READ_TIMEOUT_MS,
            log_level: "info".into(),
            serial: None,
        }
    }
}

impl DriverConfig {
    /// Load from the default location, falling back to defaults if absent.
    pub fn load() -> Result<Self> {
        Self::load_from(&get_config_path()?)
    }

    /// Load from `path`, falling back to defaults if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| KrakenError::Config(format!("Failed to read {}: {}", path.display(), e)))?;

        let config: Self = serde_json::from_str(&content)
            .map_err(|e| KrakenError::Config(format!("Failed to parse {}: {}", path.display(), e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Write to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| KrakenError::Config(format!("Failed to create config dir: {}", e)))?;
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| KrakenError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| KrakenError::Config(format!("Failed to write config: {}", e)))
    }

    /// Reject values the transport or the poll loop cannot use.
    pub fn validate(&self) -> Result<()> {
        if self.poll_interval_secs == 0 {
            return Err(KrakenError::Config(
                "poll_interval_secs must be at least 1".into(),
            ));
        }
        if self.read_timeout_ms < 0 {
            return Err(KrakenError::Config(
                "read_timeout_ms must not be negative".into(),
            ));
        }
        Ok(())
    }
}
