//! CLI Configuration.
//!
//! Settings are read from `<data_dir>/config.json` and then overridden by
//! `BONDING_*` environment variables.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::cli::output::OutputFormat;
use crate::utils::address::Address;
use crate::utils::constants::{CONFIG_FILE_NAME, STATE_FILE_NAME};

// ═══════════════════════════════════════════════════════════════════════════════
// CLI CONFIGURATION
// ═══════════════════════════════════════════════════════════════════════════════

/// CLI Configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Data directory holding the config and state files
    pub data_dir: PathBuf,
    /// State snapshot path; defaults to `<data_dir>/bonding-state.json`
    pub state_file: Option<PathBuf>,
    /// Caller used when `--caller` is omitted
    pub default_caller: Option<Address>,
    /// Output format
    pub output: OutputFormat,
    /// Enable colored output
    pub color: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            state_file: None,
            default_caller: None,
            output: OutputFormat::Text,
            color: true,
        }
    }
}

impl CliConfig {
    /// Load from file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;

        serde_json::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Save to file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Io(e.to_string()))?;
        }

        std::fs::write(path, content).map_err(|e| ConfigError::Io(e.to_string()))
    }

    /// Resolve the effective configuration for `data_dir`.
    ///
    /// Starts from the config file in `data_dir` if present, then applies
    /// environment overrides.
    pub fn resolve(data_dir: &Path) -> Result<Self, ConfigError> {
        let path = data_dir.join(CONFIG_FILE_NAME);
        let mut config = if path.exists() {
            Self::load(&path)?
        } else {
            Self::default()
        };
        config.data_dir = data_dir.to_path_buf();
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `BONDING_*` overrides read through `lookup`
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("BONDING_STATE_FILE") {
            self.state_file = Some(PathBuf::from(path));
        }

        if let Some(caller) = lookup("BONDING_CALLER") {
            let address = caller
                .parse()
                .map_err(|e| ConfigError::Validation(format!("BONDING_CALLER: {}", e)))?;
            self.default_caller = Some(address);
        }

        if let Some(output) = lookup("BONDING_OUTPUT") {
            self.output = output
                .parse()
                .map_err(|e: String| ConfigError::Validation(format!("BONDING_OUTPUT: {}", e)))?;
        }

        if lookup("NO_COLOR").is_some() {
            self.color = false;
        }

        Ok(())
    }

    /// Effective state snapshot path
    pub fn state_path(&self) -> PathBuf {
        self.state_file
            .clone()
            .unwrap_or_else(|| self.data_dir.join(STATE_FILE_NAME))
    }

    /// Config file path inside the data directory
    pub fn config_path(&self) -> PathBuf {
        self.data_dir.join(CONFIG_FILE_NAME)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(ConfigError::Validation("Data directory cannot be empty".into()));
        }

        if let Some(state) = &self.state_file {
            if state.as_os_str().is_empty() {
                return Err(ConfigError::Validation("State file path cannot be empty".into()));
            }
        }

        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// CONFIG ERROR
// ═══════════════════════════════════════════════════════════════════════════════

/// Configuration error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(String),
    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),
    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),
    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

// ═══════════════════════════════════════════════════════════════════════════════
// HELPER FUNCTIONS
// ═══════════════════════════════════════════════════════════════════════════════

/// Get default data directory
fn default_data_dir() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join(".bonding");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join("Library/Application Support/bonding");
        }
    }

    #[cfg(target_os = "windows")]
    {
        if let Ok(appdata) = std::env::var("APPDATA") {
            return PathBuf::from(appdata).join("bonding");
        }
    }

    PathBuf::from(".bonding")
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_config_default() {
        let config = CliConfig::default();
        assert_eq!(config.output, OutputFormat::Text);
        assert!(config.default_caller.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_state_path_default_and_override() {
        let mut config = CliConfig {
            data_dir: PathBuf::from("/tmp/bonding"),
            ..Default::default()
        };
        assert_eq!(config.state_path(), PathBuf::from("/tmp/bonding").join(STATE_FILE_NAME));

        config.state_file = Some(PathBuf::from("/elsewhere/state.json"));
        assert_eq!(config.state_path(), PathBuf::from("/elsewhere/state.json"));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = CliConfig::default();
        config
            .apply_env(env(&[
                ("BONDING_CALLER", "0x1111111111111111111111111111111111111111"),
                ("BONDING_OUTPUT", "json"),
                ("NO_COLOR", "1"),
            ]))
            .unwrap();

        assert_eq!(config.default_caller, Some(Address::repeat_byte(0x11)));
        assert_eq!(config.output, OutputFormat::Json);
        assert!(!config.color);
    }

    #[test]
    fn test_env_rejects_bad_caller() {
        let mut config = CliConfig::default();
        let result = config.apply_env(env(&[("BONDING_CALLER", "not-an-address")]));
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        let config = CliConfig {
            data_dir: dir.path().to_path_buf(),
            default_caller: Some(Address::repeat_byte(0xad)),
            ..Default::default()
        };

        config.save(&path).unwrap();
        assert_eq!(CliConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, r#"{ "output": "json" }"#).unwrap();

        let config = CliConfig::load(&path).unwrap();
        assert_eq!(config.output, OutputFormat::Json);
        assert!(config.color);
    }

    #[test]
    fn test_config_validation() {
        let mut config = CliConfig::default();
        assert!(config.validate().is_ok());

        config.data_dir = PathBuf::new();
        assert!(config.validate().is_err());
    }
}
