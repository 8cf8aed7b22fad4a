//! Configuration management
//!
//! This module handles loading and parsing configuration for the blogger add-on.
//! Configuration can be loaded from:
//! - config.yml file
//! - Environment variables (override file settings)
//!
//! Missing optional values are filled with sensible defaults.

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Blogger add-on settings
    #[serde(default)]
    pub blogger: BloggerConfig,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database driver (sqlite or mysql)
    #[serde(default)]
    pub driver: DatabaseDriver,
    /// Database connection URL
    #[serde(default = "default_database_url")]
    pub url: String,
    /// Prefix prepended to every table name of the host CMS
    #[serde(default = "default_table_prefix")]
    pub table_prefix: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            driver: DatabaseDriver::default(),
            url: default_database_url(),
            table_prefix: default_table_prefix(),
        }
    }
}

fn default_database_url() -> String {
    "data/blogger.db".to_string()
}

fn default_table_prefix() -> String {
    "rex_".to_string()
}

/// Database driver type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseDriver {
    /// SQLite (default)
    #[default]
    Sqlite,
    /// MySQL
    Mysql,
}

/// Blogger add-on settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BloggerConfig {
    /// Separator of the tag id list stored on each entry
    #[serde(default = "default_tag_delimiter")]
    pub tag_delimiter: char,
}

impl Default for BloggerConfig {
    fn default() -> Self {
        Self {
            tag_delimiter: default_tag_delimiter(),
        }
    }
}

fn default_tag_delimiter() -> char {
    '|'
}

/// Error type for configuration parsing
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    FileRead {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{path}': {message}")]
    ParseError {
        path: String,
        message: String,
    },
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

impl Config {
    /// Load configuration from file
    ///
    /// If the file doesn't exist, returns default configuration.
    /// If the file exists but is invalid YAML, returns an error with details.
    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.display().to_string(),
            source: e,
        })?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = serde_yaml::from_str(&content).map_err(|e| {
            ConfigError::ParseError {
                path: path.display().to_string(),
                message: format_yaml_error(&e),
            }
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from file with environment variable overrides
    ///
    /// Environment variables follow the pattern:
    /// - BLOGGER_DATABASE_DRIVER
    /// - BLOGGER_DATABASE_URL
    /// - BLOGGER_DATABASE_TABLE_PREFIX
    /// - BLOGGER_TAG_DELIMITER
    pub fn load_with_env(path: &std::path::Path) -> anyhow::Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Check the values that end up inside SQL text or tag parsing
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_table_prefix(&self.database.table_prefix)?;

        let delimiter = self.blogger.tag_delimiter;
        if delimiter.is_ascii_digit() || delimiter == '-' || delimiter.is_whitespace() {
            return Err(ConfigError::ValidationError(format!(
                "tag_delimiter '{}' collides with tag id characters",
                delimiter
            )));
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(driver) = std::env::var("BLOGGER_DATABASE_DRIVER") {
            match driver.to_lowercase().as_str() {
                "sqlite" => self.database.driver = DatabaseDriver::Sqlite,
                "mysql" => self.database.driver = DatabaseDriver::Mysql,
                _ => {} // Ignore invalid values
            }
        }
        if let Ok(url) = std::env::var("BLOGGER_DATABASE_URL") {
            self.database.url = url;
        }
        if let Ok(prefix) = std::env::var("BLOGGER_DATABASE_TABLE_PREFIX") {
            self.database.table_prefix = prefix;
        }

        if let Ok(delimiter) = std::env::var("BLOGGER_TAG_DELIMITER") {
            let mut chars = delimiter.chars();
            if let (Some(c), None) = (chars.next(), chars.next()) {
                self.blogger.tag_delimiter = c;
            }
        }
    }
}

/// Table prefixes are interpolated into SQL text, so only identifier
/// characters are accepted.
pub fn validate_table_prefix(prefix: &str) -> Result<(), ConfigError> {
    if prefix.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(format!(
            "table_prefix '{}' may only contain ASCII letters, digits and '_'",
            prefix
        )))
    }
}

/// Format YAML parsing error with location and context
fn format_yaml_error(e: &serde_yaml::Error) -> String {
    if let Some(location) = e.location() {
        format!(
            "at line {}, column {}: {}",
            location.line(),
            location.column(),
            e
        )
    } else {
        e.to_string()
    }
}

// Shared by every test that touches BLOGGER_* environment variables.
#[cfg(test)]
static CONFIG_ENV_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());

#[cfg(test)]
fn clear_env() {
    std::env::remove_var("BLOGGER_DATABASE_DRIVER");
    std::env::remove_var("BLOGGER_DATABASE_URL");
    std::env::remove_var("BLOGGER_DATABASE_TABLE_PREFIX");
    std::env::remove_var("BLOGGER_TAG_DELIMITER");
}
