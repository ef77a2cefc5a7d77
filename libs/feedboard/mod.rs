//! Feedboard
//!
//! Live unconfirmed-transaction feed with a bounded ledger, and a persisted
//! workspace layout of stackable rectangles.

pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod utils;

// Re-export commonly used items
pub use application::{LayoutStore, TransactionFeed};
pub use domain::{
    clamp_size, default_layout, Btc, LayoutElement, Ledger, LedgerSnapshot, SharedLedger,
    TransactionRecord, HISTORY_CAPACITY, MIN_ELEMENT_SIZE,
};
pub use error::{FeedboardError, Result};
pub use infrastructure::{
    log_client_event, FeedboardConfig, FileStore, KeyValueStore, MemoryStore, StorageError,
    BLOCKCHAIN_WS_URL, LAYOUT_STORAGE_KEY,
};
pub use utils::{init_tracing, Heartbeat, ShutdownManager};
