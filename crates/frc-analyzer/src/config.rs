//! Configuration file loading for the analyzer.
//!
//! Settings are read from `analyzer.toml` in the working directory.
//! A missing file is not an error; every field has a default, so the
//! analyzer runs unconfigured against a `stockfish` found on `PATH`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use uci_driver::EngineConfig;

/// Errors that can occur when loading or parsing configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse the configuration file as valid TOML.
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Main analyzer configuration structure.
///
/// The `[engine]` table maps onto [`EngineConfig`] and is handed to the
/// driver unchanged; the remaining fields belong to the analysis stages.
#[derive(Debug, Deserialize, Serialize)]
pub struct AnalyzerConfig {
    /// How many candidate moves the ranked stage asks the engine for.
    /// Defaults to 2.
    #[serde(default = "default_fan_out")]
    pub fan_out: u32,
    /// Directory record files are kept in. Defaults to "data".
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Engine session settings.
    #[serde(default)]
    pub engine: EngineConfig,
}

fn default_fan_out() -> u32 {
    2
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            fan_out: default_fan_out(),
            data_dir: default_data_dir(),
            engine: EngineConfig::default(),
        }
    }
}

impl AnalyzerConfig {
    /// Loads the analyzer configuration from disk.
    ///
    /// Reads and parses the file at [`Self::config_path()`]. If the file
    /// does not exist, returns the default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadError`] if the file exists but cannot be
    /// read, or [`ConfigError::ParseError`] if it contains invalid TOML.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path();
        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Ok(toml::from_str(&content)?)
        } else {
            Ok(Self::default())
        }
    }

    /// Returns the path to the configuration file.
    ///
    /// Currently returns `analyzer.toml` in the current working directory.
    pub fn config_path() -> PathBuf {
        PathBuf::from("analyzer.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
fan_out = 3
data_dir = "records"

[engine]
engine_path = "/usr/bin/stockfish"
depth = 25
movetime_ms = 4000
threads = 14
hash_mb = 8192
"#;

        let config: AnalyzerConfig = toml::from_str(toml_content).unwrap();

        assert_eq!(config.fan_out, 3);
        assert_eq!(config.data_dir, PathBuf::from("records"));
        assert_eq!(config.engine.engine_path, "/usr/bin/stockfish");
        assert_eq!(config.engine.depth, 25);
        assert_eq!(config.engine.movetime_ms, 4000);
        assert_eq!(config.engine.threads, 14);
        assert_eq!(config.engine.hash_mb, 8192);
        assert!(config.engine.chess960); // default
    }

    #[test]
    fn test_empty_config_defaults() {
        let config: AnalyzerConfig = toml::from_str("").unwrap();

        assert_eq!(config.fan_out, 2);
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.engine.engine_path, "stockfish");
        assert_eq!(config.engine.depth, 20);
    }

    #[test]
    fn test_partial_engine_table_fills_defaults() {
        let toml_content = r#"
[engine]
depth = 12
"#;

        let config: AnalyzerConfig = toml::from_str(toml_content).unwrap();

        assert_eq!(config.engine.depth, 12);
        assert_eq!(config.engine.movetime_ms, 8000); // default
        assert_eq!(config.fan_out, 2); // default
    }

    #[test]
    fn test_default_matches_empty_file() {
        let parsed: AnalyzerConfig = toml::from_str("").unwrap();
        let built = AnalyzerConfig::default();

        assert_eq!(parsed.fan_out, built.fan_out);
        assert_eq!(parsed.data_dir, built.data_dir);
        assert_eq!(parsed.engine.engine_path, built.engine.engine_path);
        assert_eq!(parsed.engine.deadline_ms, built.engine.deadline_ms);
    }

    #[test]
    fn test_config_path_returns_expected_path() {
        assert_eq!(
            AnalyzerConfig::config_path(),
            PathBuf::from("analyzer.toml")
        );
    }

    #[test]
    fn test_serialization_roundtrip() {
        let config = AnalyzerConfig {
            fan_out: 5,
            data_dir: PathBuf::from("/tmp/frc"),
            engine: EngineConfig {
                depth: 30,
                ..EngineConfig::default()
            },
        };

        let serialized = toml::to_string(&config).unwrap();
        let deserialized: AnalyzerConfig = toml::from_str(&serialized).unwrap();

        assert_eq!(deserialized.fan_out, 5);
        assert_eq!(deserialized.data_dir, PathBuf::from("/tmp/frc"));
        assert_eq!(deserialized.engine.depth, 30);
    }
}
