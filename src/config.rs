//! Runtime configuration

use anyhow::Context;
use serde::Deserialize;
use std::path::Path;

/// Environment variable naming an optional JSON configuration file
pub const CONFIG_ENV: &str = "LAYERKV_CONFIG";

/// Interpreter configuration
///
/// Every field has a default, so a config file only needs the fields it
/// wants to change.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default tracing directive, overridden by `RUST_LOG`
    pub log_level: String,

    /// Text written before each line is read
    pub prompt: Option<String>,

    /// Initial capacity of the committed layer
    pub initial_capacity: usize,

    /// Log every command at info level
    pub echo: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            log_level: "warn".to_string(),
            prompt: None,
            initial_capacity: 1024,
            echo: false,
        }
    }
}

impl Config {
    /// Parse a configuration from JSON text
    pub fn from_json(text: &str) -> anyhow::Result<Self> {
        serde_json::from_str(text).context("invalid configuration")
    }

    /// Load a configuration file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_json(&text)
    }

    /// Load the file named by `LAYERKV_CONFIG`, or fall back to defaults
    pub fn from_env() -> anyhow::Result<Self> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}
