//! Application configuration
//!
//! Loaded from `config.toml` (default: `{config_dir}/lingo/config.toml`):
//! ```toml
//! [storage]
//! data_dir = "/home/me/.local/share/lingo"
//! records_key = "srs-records"
//! quota_bytes = 5242880
//!
//! [content]
//! language = "es"
//! max_items_per_topic = 50
//! ```
//! Every field is optional.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::kv::FileStore;
use crate::srs::DEFAULT_RECORDS_KEY;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Data directory not found")]
    DataDirNotFound,
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub content: ContentConfig,
}

/// Where and how scheduling data is stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Defaults to the platform local data directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    /// Store key holding all scheduling records
    pub records_key: String,
    /// Total bytes the store may hold; unlimited when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quota_bytes: Option<u64>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            records_key: DEFAULT_RECORDS_KEY.to_string(),
            quota_bytes: None,
        }
    }
}

/// Settings handed to the content provider at construction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Target language code, part of every cache key
    pub language: String,
    /// Cap on the items served per topic
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_items_per_topic: Option<usize>,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            language: "es".to_string(),
            max_items_per_topic: None,
        }
    }
}

impl AppConfig {
    /// Default config file location
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("lingo").join("config.toml"))
    }

    /// Load a config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load an explicit path, or the default path if it exists, or defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }

        match Self::default_path() {
            Some(default) if default.exists() => {
                log::debug!("Loading config from {:?}", default);
                Self::load(&default)
            }
            _ => Ok(Self::default()),
        }
    }

    /// Resolved data directory
    pub fn data_dir(&self) -> Result<PathBuf> {
        match &self.storage.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => FileStore::default_data_dir().map_err(|_| ConfigError::DataDirNotFound),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = AppConfig::parse("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.storage.records_key, DEFAULT_RECORDS_KEY);
        assert_eq!(config.content.language, "es");
    }

    #[test]
    fn test_partial_sections() {
        let config = AppConfig::parse(
            r#"
            [storage]
            quota_bytes = 4096

            [content]
            language = "fr"
            "#,
        )
        .unwrap();

        assert_eq!(config.storage.quota_bytes, Some(4096));
        assert_eq!(config.storage.records_key, DEFAULT_RECORDS_KEY);
        assert_eq!(config.content.language, "fr");
        assert_eq!(config.content.max_items_per_topic, None);
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(
            &path,
            "[storage]\ndata_dir = \"/tmp/lingo-data\"\nrecords_key = \"records\"\n",
        )
        .unwrap();

        let config = AppConfig::load_or_default(Some(&path)).unwrap();
        assert_eq!(config.storage.records_key, "records");
        assert_eq!(config.data_dir().unwrap(), PathBuf::from("/tmp/lingo-data"));
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let result = AppConfig::load_or_default(Some(&temp_dir.path().join("nope.toml")));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[storage\nquota_bytes = ").unwrap();

        assert!(matches!(AppConfig::load(&path), Err(ConfigError::Parse { .. })));
    }
}
