//! Configuration loading and management.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Console log source.
    pub console: ConsoleConfig,
    /// Mark-list persistence.
    #[serde(default)]
    pub marks: MarksConfig,
    /// Delayed-ban policy.
    #[serde(default)]
    pub bans: BanConfig,
}

/// Console log source configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ConsoleConfig {
    /// Path to the game client's console log file.
    pub log_path: PathBuf,
    /// How often to poll the log for appended lines, in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

/// Mark-list persistence configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MarksConfig {
    /// Path to the JSON mark-list file.
    #[serde(default = "default_marks_path")]
    pub path: PathBuf,
}

impl Default for MarksConfig {
    fn default() -> Self {
        Self {
            path: default_marks_path(),
        }
    }
}

/// Delayed-ban policy configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BanConfig {
    /// How long a name-keyed ban request may wait for identity resolution
    /// before it is dropped, in seconds.
    #[serde(default = "default_ban_expiry_secs")]
    pub expiry_secs: u64,
}

impl Default for BanConfig {
    fn default() -> Self {
        Self {
            expiry_secs: default_ban_expiry_secs(),
        }
    }
}

fn default_poll_interval_ms() -> u64 {
    250
}

fn default_marks_path() -> PathBuf {
    PathBuf::from("marks.json")
}

fn default_ban_expiry_secs() -> u64 {
    30
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [console]
            log_path = "/games/tf/console.log"
            "#,
        )
        .unwrap();

        assert_eq!(config.console.poll_interval_ms, 250);
        assert_eq!(config.marks.path, PathBuf::from("marks.json"));
        assert_eq!(config.bans.expiry_secs, 30);
    }

    #[test]
    fn explicit_values_override_defaults() {
        let config: Config = toml::from_str(
            r#"
            [console]
            log_path = "console.log"
            poll_interval_ms = 100

            [bans]
            expiry_secs = 90
            "#,
        )
        .unwrap();

        assert_eq!(config.console.poll_interval_ms, 100);
        assert_eq!(config.bans.expiry_secs, 90);
    }
}
