use std::path::PathBuf;

use log::LevelFilter;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct LoggingConfig {
    /// Write a log file
    #[serde(default = "LoggingConfig::default_enabled")]
    pub enabled: bool,
    /// error, warn, info, debug or trace
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,
    /// Duplicate log lines to stdout (garbles the preview; for snapshots)
    #[serde(default)]
    pub log_to_console: bool,
    #[serde(default = "LoggingConfig::default_append_to_file")]
    pub append_to_file: bool,
    #[serde(default = "LoggingConfig::default_rotate_logs")]
    pub rotate_logs: bool,
    /// Size in MB a log file may reach before it is rotated
    #[serde(default = "LoggingConfig::default_rotation_size_mb")]
    pub rotation_size_mb: u64,
    /// Rotated files kept around
    #[serde(default = "LoggingConfig::default_keep_log_files")]
    pub keep_log_files: u32,
    /// Directory to log into instead of the platform data dir
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_log_path: Option<PathBuf>,
}

impl LoggingConfig {
    fn default_enabled() -> bool {
        true
    }

    fn default_level() -> String {
        "info".to_string()
    }

    fn default_append_to_file() -> bool {
        true
    }

    fn default_rotate_logs() -> bool {
        true
    }

    fn default_rotation_size_mb() -> u64 {
        10
    }

    fn default_keep_log_files() -> u32 {
        5
    }

    /// Configured level; unknown names mean info
    pub fn level_filter(&self) -> LevelFilter {
        match self.level.trim().to_lowercase().as_str() {
            "off" => LevelFilter::Off,
            "error" => LevelFilter::Error,
            "warn" | "warning" => LevelFilter::Warn,
            "debug" => LevelFilter::Debug,
            "trace" => LevelFilter::Trace,
            _ => LevelFilter::Info,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: Self::default_enabled(),
            level: Self::default_level(),
            log_to_console: false,
            append_to_file: Self::default_append_to_file(),
            rotate_logs: Self::default_rotate_logs(),
            rotation_size_mb: Self::default_rotation_size_mb(),
            keep_log_files: Self::default_keep_log_files(),
            custom_log_path: None,
        }
    }
}
