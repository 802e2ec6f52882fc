//! Engine settings loaded from `~/.survey-engine/settings.toml`.
//!
//! The file is optional; if it does not exist every field falls back to its
//! `Default` value. Command-line flags override what is read here.

use crate::engine::EngineOptions;
use crate::lifecycle::NEW_ITEM_SENTINEL;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

const DEFAULT_TIMEOUT_MS: u64 = 5_000;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse settings TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

/// `[log]` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct LogSettings {
    pub json: bool,
    pub dir: Option<PathBuf>,
    /// `hourly`, `daily` or `never`.
    pub rotation: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            json: false,
            dir: None,
            rotation: "daily".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EngineSettings {
    /// Configuration document; `data/survey-config.json` when unset.
    pub config_path: Option<PathBuf>,
    /// Directory of the JSON file store.
    pub data_dir: Option<PathBuf>,
    pub store_timeout_ms: u64,
    pub sentinel_id: i64,
    pub log: LogSettings,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            config_path: None,
            data_dir: None,
            store_timeout_ms: DEFAULT_TIMEOUT_MS,
            sentinel_id: NEW_ITEM_SENTINEL,
            log: LogSettings::default(),
        }
    }
}

impl EngineSettings {
    #[must_use]
    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            store_timeout: Duration::from_millis(self.store_timeout_ms),
            sentinel_id: self.sentinel_id,
        }
    }
}

/// Canonical settings path (`~/.survey-engine/settings.toml`).
#[must_use]
pub fn settings_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".survey-engine").join("settings.toml"))
}

/// Load settings from the canonical path, defaulting when absent.
pub fn load_settings() -> Result<EngineSettings, SettingsError> {
    let Some(path) = settings_path() else {
        warn!("Could not determine home directory; using default settings");
        return Ok(EngineSettings::default());
    };
    load_settings_from(&path)
}

/// Load settings from `path`, defaulting when the file does not exist.
pub fn load_settings_from(path: &Path) -> Result<EngineSettings, SettingsError> {
    if !path.exists() {
        debug!("Settings not found at {}; using defaults", path.display());
        return Ok(EngineSettings::default());
    }

    let content = std::fs::read_to_string(path)?;
    let settings: EngineSettings = toml::from_str(&content)?;
    debug!("Loaded settings from {}", path.display());
    Ok(settings)
}
