//! Daemon configuration
//!
//! Loaded from a TOML file given on the command line, or from the copy of
//! `brailink.toml` compiled into the binary.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use brailink_core::config::{BlinkPreferences, CommandTable, DriverConfig, KeyBinding};

/// Embedded default configuration
const EMBEDDED_CONFIG: &str = include_str!("../brailink.toml");

/// Everything the daemon reads at startup
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DaemonConfig {
    /// Serial device the display is attached to
    pub device: String,
    pub driver: DriverConfig,
    /// Bindings applied on top of the default command table
    pub keys: Vec<KeyBinding>,
    pub blink: BlinkPreferences,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            device: String::from("/dev/ttyS0"),
            driver: DriverConfig::default(),
            keys: Vec::new(),
            blink: BlinkPreferences::default(),
        }
    }
}

impl DaemonConfig {
    /// Parse and validate a TOML document
    pub fn parse(source: &str) -> Result<Self> {
        let config: DaemonConfig = toml::from_str(source).context("invalid configuration")?;
        config
            .driver
            .validate()
            .map_err(|e| anyhow::anyhow!("invalid driver configuration: {e}"))?;
        Ok(config)
    }

    /// Load `path`, or the embedded defaults when no path is given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let source = std::fs::read_to_string(path)
                    .with_context(|| format!("cannot read {}", path.display()))?;
                let config = Self::parse(&source)
                    .with_context(|| format!("in {}", path.display()))?;
                tracing::info!(path = %path.display(), "loaded configuration");
                Ok(config)
            }
            None => match Self::parse(EMBEDDED_CONFIG) {
                Ok(config) => Ok(config),
                Err(e) => {
                    tracing::error!(error = %e, "embedded configuration is broken, using built-in defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    /// Command table with the configured bindings applied
    pub fn command_table(&self) -> CommandTable {
        CommandTable::from_bindings(&self.keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brailink_core::config::MAX_MODELS;

    #[test]
    fn test_embedded_config_matches_defaults() {
        let config = DaemonConfig::parse(EMBEDDED_CONFIG).unwrap();
        assert_eq!(config.driver, DriverConfig::default());
        assert_eq!(config.blink, BlinkPreferences::default());
        assert!(config.keys.is_empty());
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config = DaemonConfig::parse(
            r#"
            device = "/dev/ttyUSB0"

            [driver]
            max_attempts = 3
            init_sequence = [27, 73]

            [[keys]]
            key = 96
            command = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.device, "/dev/ttyUSB0");
        assert_eq!(config.driver.max_attempts, 3);
        assert_eq!(config.driver.init_sequence.as_slice(), &[27, 73]);
        assert_eq!(config.driver.ack_prefix.as_slice(), &[27, b'?']);
        assert_eq!(config.driver.models.len(), 3);
        assert_eq!(config.command_table().translate(96), 5);
        assert_eq!(config.command_table().translate(0x85), 0x85);
    }

    #[test]
    fn test_overlong_sequence_rejected() {
        let result = DaemonConfig::parse(
            r#"
            [driver]
            pre_data = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17]
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_too_many_models_rejected() {
        let mut source = String::new();
        for id in 0..=MAX_MODELS {
            source.push_str(&format!(
                "[[driver.models]]\nid = {id}\ncolumns = 40\nrows = 1\n"
            ));
        }
        assert!(DaemonConfig::parse(&source).is_err());
    }

    #[test]
    fn test_zero_width_model_rejected() {
        let result = DaemonConfig::parse(
            r#"
            [[driver.models]]
            id = 0
            columns = 0
            rows = 1
            "#,
        );
        assert!(result.is_err());
    }
}
