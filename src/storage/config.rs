//! Configuration handling for Octopus
//!
//! Configuration is stored in `~/.config/octopus/config.toml` (or the
//! platform equivalent). Every field is optional.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::DEFAULT_TABLE_NAME;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Output format for commands
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Table file used when `--db` is not given
    pub default_database: Option<PathBuf>,

    /// Display name written into new tables
    pub table_name: String,

    /// Default output format (text or json)
    pub default_format: OutputFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_database: None,
            table_name: DEFAULT_TABLE_NAME.to_string(),
            default_format: OutputFormat::Text,
        }
    }
}

impl Config {
    /// Returns the config directory
    pub fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("dev", "octopus", "octopus").map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Loads configuration from the default location
    pub fn load() -> Result<Self> {
        match Self::config_dir() {
            Some(dir) => Self::load_from(&dir.join("config.toml")),
            None => Ok(Self::default()),
        }
    }

    /// Loads configuration from a specific file, falling back to defaults
    /// when it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.table_name.trim().is_empty() {
            return Err(ConfigError::Invalid("table_name must not be empty".to_string()));
        }
        Ok(())
    }

    /// Saves the configuration to a specific file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, content).with_context(|| format!("Failed to write config: {}", path.display()))
    }

    /// Resolves the table file from an explicit path or the configured default
    pub fn database_path(&self, explicit: Option<&Path>) -> Result<PathBuf> {
        explicit
            .map(Path::to_path_buf)
            .or_else(|| self.default_database.clone())
            .ok_or_else(|| {
                anyhow::anyhow!("No table file given. Pass --db, set OCTOPUS_DB or set default_database in the config.")
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config() {
        let config = Config::default();

        assert_eq!(config.table_name, DEFAULT_TABLE_NAME);
        assert_eq!(config.default_format, OutputFormat::Text);
        assert!(config.default_database.is_none());
    }

    #[test]
    fn parse_config() {
        let toml = r#"
default_database = "/srv/tickets.yaml"
table_name = "CNGC-BB-2024"
default_format = "json"
"#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.default_database, Some(PathBuf::from("/srv/tickets.yaml")));
        assert_eq!(config.table_name, "CNGC-BB-2024");
        assert_eq!(config.default_format, OutputFormat::Json);
    }

    #[test]
    fn partial_config_uses_defaults() {
        let config: Config = toml::from_str("default_format = \"json\"").unwrap();

        assert_eq!(config.table_name, DEFAULT_TABLE_NAME);
        assert!(config.default_database.is_none());
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();

        assert_eq!(config.table_name, DEFAULT_TABLE_NAME);
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config {
            default_database: Some(PathBuf::from("tickets.yaml")),
            table_name: "Gala".to_string(),
            default_format: OutputFormat::Json,
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.default_database, config.default_database);
        assert_eq!(loaded.table_name, "Gala");
        assert_eq!(loaded.default_format, OutputFormat::Json);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        fs::write(&path, "default_format = \"xml\"").unwrap();
        assert!(Config::load_from(&path).is_err());

        fs::write(&path, "table_name = \"  \"").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn explicit_database_wins() {
        let config = Config {
            default_database: Some(PathBuf::from("default.yaml")),
            ..Config::default()
        };

        let path = config.database_path(Some(Path::new("explicit.yaml"))).unwrap();
        assert_eq!(path, PathBuf::from("explicit.yaml"));
        assert_eq!(config.database_path(None).unwrap(), PathBuf::from("default.yaml"));
        assert!(Config::default().database_path(None).is_err());
    }
}
