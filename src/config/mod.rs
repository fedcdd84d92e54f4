//! Configuration management
//!
//! Handles loading, validation, and merging of configuration from:
//! - TOML files
//! - CLI arguments
//!
//! Every section and field is optional; missing values take their defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub mod types;

pub use types::{LoggingConfig, TrackerConfig};

pub use crate::queue::QueueConfig;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Output queue configuration
    #[serde(default)]
    pub queue: QueueConfig,
    /// Allocation tracker configuration
    #[serde(default)]
    pub tracker: TrackerConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        match self.logging.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!("Invalid log level: {}", self.logging.level),
        }

        if self.queue.max_wait_ms == Some(0) {
            anyhow::bail!("queue.max_wait_ms must be greater than zero");
        }

        Ok(())
    }

    /// Override config with CLI arguments
    pub fn with_overrides(mut self, level: Option<String>, max_wait_ms: Option<u32>) -> Self {
        if let Some(level) = level {
            self.logging.level = level;
        }
        if max_wait_ms.is_some() {
            self.queue.max_wait_ms = max_wait_ms;
        }

        self
    }
}
