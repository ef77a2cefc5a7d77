//! Parsing and delivery seams
//!
//! ```text
//! frame ─► MessageRouter::parse ─┬─ Ok(Some(m)) ─► route_key(m) ─► handler thread
//!                                ├─ Ok(None)    ─► counted as discarded
//!                                └─ Err(_)      ─► logged, counted as discarded
//! ```
//!
//! Parsing happens inside the I/O task one frame at a time, so a handler
//! sees its messages in the order the server sent them. After shutdown no
//! handler is called again, even for messages already queued.

use crate::{Result, WsMessage};
use async_trait::async_trait;
use std::fmt::Debug;
use std::hash::Hash;

/// Turns raw frames into typed messages and picks their handler
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// enum Route { Payments }
///
/// struct PaymentRouter;
///
/// #[async_trait]
/// impl MessageRouter for PaymentRouter {
///     type Message = Payment;
///     type RouteKey = Route;
///
///     async fn parse(&self, message: WsMessage) -> Result<Option<Payment>> {
///         match message.as_text() {
///             Some(text) => decode_payment(text),
///             None => Ok(None),
///         }
///     }
///
///     fn route_key(&self, _payment: &Payment) -> Route {
///         Route::Payments
///     }
/// }
/// ```
#[async_trait]
pub trait MessageRouter: Send + Sync + 'static {
    type Message: Send + Debug + 'static;

    type RouteKey: Hash + Eq + Clone + Send + Sync + Debug + 'static;

    /// `Ok(None)` drops a well-formed frame of another kind without noise;
    /// `Err` marks the frame as malformed.
    async fn parse(&self, message: WsMessage) -> Result<Option<Self::Message>>;

    fn route_key(&self, message: &Self::Message) -> Self::RouteKey;
}

/// Consumes the messages of one route on a dedicated OS thread
///
/// Errors are logged and the thread keeps going with the next message.
pub trait MessageHandler<M>: Send + 'static
where
    M: Send + Debug + 'static,
{
    fn handle(&mut self, message: M) -> Result<()>;
}
