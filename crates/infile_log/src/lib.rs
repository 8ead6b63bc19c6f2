//! InFile Logging Module
//!
//! Structured logging for the command-line front end.

mod logging;

pub use logging::{cleanup_old_logs, init_logging, LOG_FILE_PREFIX};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Get the default log directory
pub fn log_dir() -> PathBuf {
    ProjectDirs::from("com", "InFile", "InFile")
        .map(|dirs| dirs.data_dir().join("logs"))
        .unwrap_or_else(|| PathBuf::from("./logs"))
}

/// Logging settings, the `[logging]` table of the config file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogOptions {
    /// Filter used when `RUST_LOG` is not set
    pub level: String,
    /// JSON console output instead of the pretty format
    pub json: bool,
    /// Also write a daily rolling JSON log file
    pub file: bool,
    /// Log file directory, [`log_dir`] when unset
    pub directory: Option<PathBuf>,
    /// Remove log files older than this many days at startup (0 keeps all)
    pub retention_days: u32,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            json: false,
            file: false,
            directory: None,
            retention_days: 14,
        }
    }
}

impl LogOptions {
    /// Directory the file layer writes to
    pub fn resolved_directory(&self) -> PathBuf {
        self.directory.clone().unwrap_or_else(log_dir)
    }
}
