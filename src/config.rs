//! Configuration management for BrandMeld
//!
//! This module handles loading, validating, and saving configuration:
//! where state is stored, which storage backend to use, and how the
//! generation service is called.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = ".brandmeld.json";

/// Default generation model
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Default environment variable holding the API key
pub const DEFAULT_API_KEY_ENV: &str = "API_KEY";

/// Default Gemini API endpoint
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default preview length in the history list
pub const DEFAULT_PREVIEW_CHARS: usize = 120;

/// Main configuration structure for BrandMeld
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding stored state
    pub data_dir: PathBuf,

    /// Storage configuration
    pub storage: StorageConfig,

    /// Generation service configuration
    pub generation: GenerationConfig,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// Output configuration
    pub display: DisplayConfig,
}

/// Which storage backend holds state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// One JSON file per key
    File,
    /// A single SQLite database
    Sqlite,
}

/// Configuration for storage
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Backend to use
    pub backend: StorageBackend,

    /// Database file name inside the data directory
    pub database_file: String,
}

/// Configuration for the generation service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Model name
    pub model: String,

    /// Environment variable holding the API key
    pub api_key_env: String,

    /// API base URL
    pub base_url: String,

    /// Whole-request timeout in seconds
    pub request_timeout_secs: u64,

    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,

    /// Sampling temperature for content generation
    pub generate_temperature: f32,

    /// Nucleus sampling for content generation
    pub generate_top_p: f32,

    /// Sampling temperature for voice analysis
    pub analysis_temperature: f32,

    /// Sampling temperature for audits
    pub audit_temperature: f32,

    /// Whether voice analysis may use web search grounding
    pub search_grounding: bool,
}

/// Configuration for logging
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level used when RUST_LOG is not set (trace, debug, info, warn, error)
    pub level: String,
}

/// Configuration for output
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Characters of generated content shown per history entry
    pub preview_chars: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: crate::default_data_dir(),
            storage: StorageConfig::default(),
            generation: GenerationConfig::default(),
            logging: LoggingConfig::default(),
            display: DisplayConfig::default(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::File,
            database_file: crate::database::DEFAULT_DATABASE_FILE.to_string(),
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: 120,
            connect_timeout_secs: 10,
            generate_temperature: 0.8,
            generate_top_p: 0.95,
            analysis_temperature: 0.5,
            audit_temperature: 0.5,
            search_grounding: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            preview_chars: DEFAULT_PREVIEW_CHARS,
        }
    }
}

impl Config {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        let config_path = Self::default_config_path()?;
        self.save_to_path(&config_path)
    }

    /// Save configuration to a specific path
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        self.validate()?;

        // Create parent directories if they don't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;

        Ok(())
    }

    /// Get the default configuration file path
    pub fn default_config_path() -> Result<PathBuf> {
        let home = home::home_dir().ok_or(Error::HomeDirectoryNotFound)?;
        Ok(home.join(DEFAULT_CONFIG_FILE))
    }

    /// Path of the SQLite database file
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(&self.storage.database_file)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let g = &self.generation;

        if g.model.trim().is_empty() {
            return Err(Error::config_validation(
                "generation.model",
                "must not be empty",
            ));
        }

        if g.api_key_env.trim().is_empty() {
            return Err(Error::config_validation(
                "generation.api_key_env",
                "must not be empty",
            ));
        }

        if !(g.base_url.starts_with("https://") || g.base_url.starts_with("http://")) {
            return Err(Error::config_validation(
                "generation.base_url",
                "must be an http(s) URL",
            ));
        }

        if g.request_timeout_secs == 0 || g.connect_timeout_secs == 0 {
            return Err(Error::config_validation(
                "generation.timeouts",
                "must be greater than 0",
            ));
        }

        for (field, value) in [
            ("generation.generate_temperature", g.generate_temperature),
            ("generation.analysis_temperature", g.analysis_temperature),
            ("generation.audit_temperature", g.audit_temperature),
        ] {
            if !(0.0..=2.0).contains(&value) {
                return Err(Error::config_validation(field, "must be between 0 and 2"));
            }
        }

        if !(g.generate_top_p > 0.0 && g.generate_top_p <= 1.0) {
            return Err(Error::config_validation(
                "generation.generate_top_p",
                "must be in (0, 1]",
            ));
        }

        if self.storage.database_file.trim().is_empty() {
            return Err(Error::config_validation(
                "storage.database_file",
                "must not be empty",
            ));
        }

        // Validate logging level
        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(Error::config_validation(
                    "logging.level",
                    "must be one of: trace, debug, info, warn, error",
                ))
            }
        }

        if self.display.preview_chars == 0 {
            return Err(Error::config_validation(
                "display.preview_chars",
                "must be greater than 0",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.generation.model, DEFAULT_MODEL);
        assert_eq!(config.generation.api_key_env, DEFAULT_API_KEY_ENV);
        assert_eq!(config.storage.backend, StorageBackend::File);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();

        config.generation.model = " ".to_string();
        assert!(config.validate().is_err());

        config = Config::default();
        config.generation.generate_temperature = 2.5;
        assert!(config.validate().is_err());

        config = Config::default();
        config.generation.generate_top_p = 0.0;
        assert!(config.validate().is_err());

        config = Config::default();
        config.generation.base_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());

        config = Config::default();
        config.logging.level = "loud".to_string();
        assert!(config.validate().is_err());

        config = Config::default();
        config.generation.request_timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_save_load() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("config.json");

        let mut config = Config::default();
        config.storage.backend = StorageBackend::Sqlite;
        config.generation.model = "gemini-2.5-pro".to_string();

        config.save_to_path(&config_path).unwrap();
        let loaded = Config::load_from_path(&config_path).unwrap();

        assert_eq!(loaded.storage.backend, StorageBackend::Sqlite);
        assert_eq!(loaded.generation.model, "gemini-2.5-pro");
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let config = Config::load_from_path(&temp.path().join("absent.json")).unwrap();
        assert_eq!(config.generation.model, DEFAULT_MODEL);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("partial.json");
        fs::write(&path, r#"{"storage": {"backend": "sqlite"}}"#).unwrap();

        let config = Config::load_from_path(&path).unwrap();
        assert_eq!(config.storage.backend, StorageBackend::Sqlite);
        assert_eq!(
            config.storage.database_file,
            crate::database::DEFAULT_DATABASE_FILE
        );
        assert_eq!(config.generation.generate_temperature, 0.8);
    }

    #[test]
    fn test_database_path() {
        let mut config = Config::default();
        config.data_dir = PathBuf::from("/tmp/bm");
        assert_eq!(
            config.database_path(),
            PathBuf::from("/tmp/bm").join(crate::database::DEFAULT_DATABASE_FILE)
        );
    }
}
