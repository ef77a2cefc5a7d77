//! Infrastructure Layer
//!
//! Implementations of external interfaces: the blockchain.info WebSocket
//! feed, durable key-value storage and configuration files.

pub mod client;
pub mod config;
pub mod storage;

pub use client::blockchain::{
    build_feed_client, log_client_event, FeedClient, FeedRoute, FeedRouter, LedgerHandler,
    BLOCKCHAIN_WS_URL,
};
pub use config::{ConfigError, FeedConfig, FeedboardConfig, StorageConfig};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError, LAYOUT_STORAGE_KEY};
