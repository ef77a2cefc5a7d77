use crate::infrastructure::client::blockchain::BLOCKCHAIN_WS_URL;
use crate::infrastructure::storage::LAYOUT_STORAGE_KEY;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load config file: {0}")]
    FileError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Top-level configuration
///
/// Every field has a default, so an empty or missing file is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedboardConfig {
    pub feed: FeedConfig,
    pub storage: StorageConfig,
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Push source for unconfirmed transactions
    pub ws_url: String,
    /// Seconds between ledger summary log lines
    pub summary_interval_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the key-value files
    pub dir: PathBuf,
    /// Slot name for the workspace layout
    pub layout_key: String,
}

impl Default for FeedboardConfig {
    fn default() -> Self {
        Self {
            feed: FeedConfig::default(),
            storage: StorageConfig::default(),
            log_level: default_log_level(),
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            ws_url: BLOCKCHAIN_WS_URL.to_string(),
            summary_interval_secs: 10,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(".feedboard"),
            layout_key: LAYOUT_STORAGE_KEY.to_string(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl FeedboardConfig {
    /// Load configuration from a YAML file, falling back to defaults when
    /// the file does not exist
    pub fn load(config_path: impl AsRef<Path>) -> Result<Self> {
        let path = config_path.as_ref();

        if !path.exists() {
            info!("Config file {:?} not found, using defaults", path);
            return Ok(Self::default());
        }

        let yaml_content = std::fs::read_to_string(path)?;
        let config = Self::from_yaml(&yaml_content)?;

        info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: FeedboardConfig = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let url = &self.feed.ws_url;
        if !(url.starts_with("ws://") || url.starts_with("wss://")) {
            return Err(ConfigError::ValidationError(format!(
                "feed.ws_url must be a ws:// or wss:// URL, got {:?}",
                url
            )));
        }

        if self.feed.summary_interval_secs == 0 {
            return Err(ConfigError::ValidationError(
                "feed.summary_interval_secs must be greater than 0".to_string(),
            ));
        }

        if self.storage.layout_key.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "storage.layout_key must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}
