//! Client, its configuration, the builder and the shared state cells
//!
//! ```rust,ignore
//! let client = hypersockets::builder()
//!     .url("wss://feed.example.com/stream")
//!     .router(PaymentRouter, |routing| routing.handler(Route::Payments, PaymentLog::default()))
//!     .subscription(WsMessage::text(r#"{"op":"payments_sub"}"#))
//!     .build()
//!     .await?;
//!
//! // ... later, from the owner
//! client.shutdown().await?;
//! ```

pub mod builder;
pub mod client;
pub mod config;
pub mod connection_state;

pub use builder::{states, RoutingBuilder, WebSocketClientBuilder};
pub use client::{ClientEvent, Metrics, WebSocketClient};
pub use config::ClientConfig;
pub use connection_state::{AtomicConnectionState, AtomicMetrics, ConnectionState};

pub use crate::traits::*;

/// Start a builder with neither URL nor router set
pub fn builder(
) -> WebSocketClientBuilder<builder::states::NoUrl, builder::states::NoRouter, (), ()> {
    WebSocketClientBuilder::new()
}
