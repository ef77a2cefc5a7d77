//! # HyperSockets
//!
//! A small, modular WebSocket client with an explicit connection lifecycle.
//!
//! ## Features
//!
//! - **Explicit state**: `Disconnected → Connecting → Connected`, held atomically
//! - **Type-state builder**: Compile-time guarantees for required configuration
//! - **Ordered routing**: Messages are parsed in arrival order and handed to
//!   one handler thread per route key
//! - **Single-shot connections**: A client never reconnects on its own; the
//!   owner decides whether to build a new one
//! - **Clean stop**: Normal-closure close frame, no handler runs after shutdown

pub mod traits;
pub mod core;

// Re-export all traits
pub use traits::*;

// Re-export core client functionality
pub use self::core::{
    builder, client, config, connection_state,
    builder::{states, RoutingBuilder, WebSocketClientBuilder},
    client::{ClientEvent, Metrics, WebSocketClient},
    config::ClientConfig,
    connection_state::{AtomicConnectionState, AtomicMetrics, ConnectionState},
};

/// Type alias for Result with HyperSocketError
pub type Result<T> = std::result::Result<T, traits::HyperSocketError>;
