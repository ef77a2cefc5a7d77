//! Feedboard - Main Library
//!
//! ## Architecture
//!
//! - **bin_common**: Shared pieces of the binaries (config path, console commands, runner)
//! - **feedboard**: Transaction feed, ledger and layout store (re-exported from workspace)
//! - **hypersockets**: WebSocket library (re-exported from workspace)
//!
//! ## Usage in Binaries
//!
//! ```rust
//! use feedboard_app::bin_common::{load_config_from_env, ConfigType};
//! use feedboard_app::feedboard::TransactionFeed;
//! ```

// Re-export workspace libraries for convenience
pub use feedboard;
pub use hypersockets;

// Binary common utilities
pub mod bin_common {
    //! Common utilities for binary executables

    pub mod cli;
    pub mod commands;
    pub mod runner;

    pub use cli::{load_config, load_config_from_env, parse_args, ConfigType};
    pub use commands::{FeedCommand, LayoutCommand};
    pub use runner::{BinaryRunner, RunConfig};
}
