//! # HyperSockets Traits
//!
//! Core traits and types for the HyperSockets WebSocket client library.
//!
//! - **MessageRouter**: Parse incoming WebSocket messages and pick a route
//! - **MessageHandler**: Consume routed messages sequentially
//! - **HyperSocketError**: Error type shared by every layer
//!
//! ## Example
//!
//! ```rust,ignore
//! use hypersockets::*;
//!
//! struct EchoRouter;
//!
//! #[async_trait]
//! impl MessageRouter for EchoRouter {
//!     type Message = String;
//!     type RouteKey = ();
//!
//!     async fn parse(&self, message: WsMessage) -> Result<Option<String>> {
//!         Ok(message.as_text().map(str::to_string))
//!     }
//!
//!     fn route_key(&self, _message: &String) {}
//! }
//! ```

pub mod error;
pub mod parser;
pub mod router;

// Re-export commonly used types
pub use error::{HyperSocketError, Result};
pub use parser::WsMessage;
pub use router::{MessageHandler, MessageRouter};
