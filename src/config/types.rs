//! Configuration section types

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Allocation tracker configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Warn when more records than this are live at once (0 = never)
    #[serde(default = "default_warn_live_threshold")]
    pub warn_live_threshold: u64,

    /// Fail the run when records are still live after replay
    #[serde(default = "default_leak_check")]
    pub leak_check: bool,
}

fn default_warn_live_threshold() -> u64 {
    1024
}

fn default_leak_check() -> bool {
    true
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            warn_live_threshold: default_warn_live_threshold(),
            leak_check: default_leak_check(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level ("trace", "debug", "info", "warn", "error")
    #[serde(default = "default_level")]
    pub level: String,

    /// Log file (None = console only)
    #[serde(default)]
    pub log_file: Option<PathBuf>,

    /// Emit record lines for keyboard, flags, consumer key and wait records
    #[serde(default = "default_debug")]
    pub debug: bool,

    /// Emit record lines for pointer and scroll records
    #[serde(default)]
    pub debug_pointing: bool,
}

fn default_level() -> String {
    "info".to_string()
}

fn default_debug() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            log_file: None,
            debug: default_debug(),
            debug_pointing: false,
        }
    }
}
