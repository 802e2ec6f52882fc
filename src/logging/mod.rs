//! Subscriber setup for the command-line tool.

mod init;

pub use init::{init_logging, parse_rotation};

use crate::settings::LogSettings;
use std::path::PathBuf;
use tracing::Level;
use tracing_appender::rolling::Rotation;

/// Log filename inside the log directory.
pub const LOG_FILENAME: &str = "survey-engine.log";

/// Configuration for the logging system.
pub struct LogConfig {
    pub log_dir: PathBuf,
    /// Default level when `RUST_LOG` is not set.
    pub log_level: Level,
    pub json_format: bool,
    pub rotation: Rotation,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_dir: default_log_dir(),
            log_level: Level::INFO,
            json_format: false,
            rotation: Rotation::DAILY,
        }
    }
}

impl LogConfig {
    /// Build from the `[log]` settings table.
    #[must_use]
    pub fn from_settings(settings: &LogSettings) -> Self {
        Self {
            log_dir: settings.dir.clone().unwrap_or_else(default_log_dir),
            log_level: Level::INFO,
            json_format: settings.json,
            rotation: parse_rotation(&settings.rotation),
        }
    }

    /// Path of the current log file's base name.
    #[must_use]
    pub fn log_file(&self) -> PathBuf {
        self.log_dir.join(LOG_FILENAME)
    }
}

fn default_log_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".survey-engine")
        .join("logs")
}
