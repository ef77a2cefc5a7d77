//! Crate-level error type

use crate::infrastructure::config::ConfigError;
use crate::infrastructure::storage::StorageError;
use hypersockets::HyperSocketError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FeedboardError {
    #[error("Socket error: {0}")]
    Socket(#[from] HyperSocketError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, FeedboardError>;
