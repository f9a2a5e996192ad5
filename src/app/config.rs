//! Configuration for the editor
//!
//! Settings come from three layers, highest precedence first:
//! command-line flags, the JSON config file, built-in defaults.

use std::path::{Path, PathBuf};

use clap::Parser;
use serde::{Deserialize, Serialize};

use crate::core::DEFAULT_TAB_STOP;

/// Widest tab stop we accept
const MAX_TAB_STOP: usize = 32;

/// CLI arguments for Mochi Edit
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "mochi-edit")]
#[command(version)]
#[command(about = "A small terminal text editor", long_about = None)]
pub struct CliArgs {
    /// File to open
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Path to custom config file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Columns between tab stops
    #[arg(long, value_name = "N")]
    pub tab_stop: Option<usize>,

    /// Extra Ctrl-Q presses required to quit with unsaved changes
    #[arg(long, value_name = "N")]
    pub quit_times: Option<usize>,

    /// Write logs to this file
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}

/// Editor configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Columns between tab stops
    pub tab_stop: usize,
    /// Extra Ctrl-Q presses required to quit with unsaved changes
    pub quit_times: usize,
    /// Seconds a status message stays visible
    pub message_timeout_secs: u64,
    /// Log file; logging is off when unset
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tab_stop: DEFAULT_TAB_STOP,
            quit_times: 3,
            message_timeout_secs: 5,
            log_file: None,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration from default location or return default config
    pub fn load_or_default() -> Self {
        // Try to load from ~/.config/mochi-edit/config.json
        if let Some(config_path) = default_config_path() {
            if config_path.exists() {
                match Self::load(&config_path) {
                    Ok(config) => return config,
                    Err(e) => tracing::warn!("ignoring {}: {}", config_path.display(), e),
                }
            }
        }
        Self::default()
    }

    /// Build the effective configuration: CLI > config file > defaults.
    ///
    /// An explicitly named config file must load; the default one is
    /// optional.
    pub fn load_with_args(args: &CliArgs) -> Result<Self, ConfigError> {
        let mut config = match &args.config {
            Some(path) => Self::load(path)?,
            None => Self::load_or_default(),
        };

        if let Some(tab_stop) = args.tab_stop {
            config.tab_stop = tab_stop;
        }
        if let Some(quit_times) = args.quit_times {
            config.quit_times = quit_times;
        }
        if let Some(log_file) = &args.log_file {
            config.log_file = Some(log_file.clone());
        }

        config.validate()?;
        Ok(config)
    }

    /// Check values are usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tab_stop == 0 || self.tab_stop > MAX_TAB_STOP {
            return Err(ConfigError::Invalid(format!(
                "tab_stop must be between 1 and {}, got {}",
                MAX_TAB_STOP, self.tab_stop
            )));
        }
        Ok(())
    }
}

/// Get the default configuration file path
fn default_config_path() -> Option<PathBuf> {
    std::env::var("HOME").ok().map(|home| {
        PathBuf::from(home)
            .join(".config")
            .join("mochi-edit")
            .join("config.json")
    })
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.tab_stop, 8);
        assert_eq!(config.quit_times, 3);
        assert_eq!(config.message_timeout_secs, 5);
        assert!(config.log_file.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_partial_file_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{ "tab_stop": 4 }"#).unwrap();
        assert_eq!(config.tab_stop, 4);
        assert_eq!(config.quit_times, 3);
    }

    #[test]
    fn test_config_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let config = Config {
            tab_stop: 2,
            quit_times: 1,
            ..Config::default()
        };

        config.save(&path).unwrap();
        assert_eq!(Config::load(&path).unwrap(), config);
    }

    #[test]
    fn test_config_rejects_bad_tab_stop() {
        let config = Config {
            tab_stop: 0,
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_cli_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "tab_stop": 4, "quit_times": 5 }"#).unwrap();

        let args = CliArgs::parse_from([
            "mochi-edit",
            "--config",
            path.to_str().unwrap(),
            "--quit-times",
            "0",
            "notes.txt",
        ]);
        let config = Config::load_with_args(&args).unwrap();

        assert_eq!(config.tab_stop, 4);
        assert_eq!(config.quit_times, 0);
        assert_eq!(args.file, Some(PathBuf::from("notes.txt")));
    }

    #[test]
    fn test_missing_explicit_config_is_error() {
        let args = CliArgs {
            config: Some(PathBuf::from("/nonexistent/mochi-edit.json")),
            ..CliArgs::default()
        };
        assert!(matches!(
            Config::load_with_args(&args),
            Err(ConfigError::Io(_))
        ));
    }
}
