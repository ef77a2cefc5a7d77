//! CLI utilities for binaries
//!
//! Handles configuration loading and environment variables
//! for all binary executables.

use feedboard::infrastructure::ConfigError;
use feedboard::FeedboardConfig;
use std::path::PathBuf;

/// Type of configuration to load
#[derive(Debug, Clone)]
pub enum ConfigType {
    /// Feedboard configuration (config/feedboard.yaml)
    Feedboard,
    /// Custom path
    Custom(String),
}

impl ConfigType {
    /// Get the default path for this config type
    pub fn default_path(&self) -> &str {
        match self {
            ConfigType::Feedboard => "config/feedboard.yaml",
            ConfigType::Custom(path) => path,
        }
    }

    /// Get the environment variable name for this config type
    pub fn env_var_name(&self) -> &str {
        match self {
            ConfigType::Feedboard => "FEEDBOARD_CONFIG_PATH",
            ConfigType::Custom(_) => "CONFIG_PATH",
        }
    }
}

/// Load configuration path from environment or use default
///
/// # Examples
/// ```
/// use feedboard_app::bin_common::{load_config_from_env, ConfigType};
///
/// let path = load_config_from_env(ConfigType::Feedboard);
/// ```
pub fn load_config_from_env(config_type: ConfigType) -> PathBuf {
    std::env::var(config_type.env_var_name())
        .unwrap_or_else(|_| config_type.default_path().to_string())
        .into()
}

/// Resolve the config path and load it; a missing file yields defaults
pub fn load_config(config_type: ConfigType) -> Result<FeedboardConfig, ConfigError> {
    FeedboardConfig::load(load_config_from_env(config_type))
}

/// Parse command line arguments for a binary
///
/// Returns a vector of arguments (excluding the program name)
pub fn parse_args() -> Vec<String> {
    std::env::args().skip(1).collect()
}
