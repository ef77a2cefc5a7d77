use crate::traits::*;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Configuration for WebSocketClient with routing support
///
/// Built by the type-state builder and shared with the I/O task.
pub struct ClientConfig<R, M>
where
    R: MessageRouter<Message = M>,
    M: Send + std::fmt::Debug + 'static,
{
    /// WebSocket URL (wss:// or ws://)
    pub(crate) url: String,

    /// Message router for parsing and routing messages
    pub(crate) router: Arc<R>,

    /// Channel senders mapped by route key (for routing messages)
    pub(crate) route_senders: HashMap<R::RouteKey, crossbeam_channel::Sender<M>>,

    /// Subscription messages to send right after the handshake
    pub(crate) subscriptions: Vec<WsMessage>,

    /// Running flag - set to false on shutdown; nothing is routed or
    /// handled once it is cleared
    pub(crate) shutdown_flag: Arc<AtomicBool>,
}

impl<R, M> ClientConfig<R, M>
where
    R: MessageRouter<Message = M>,
    M: Send + std::fmt::Debug + 'static,
{
    /// Get a reference to the URL
    pub fn url(&self) -> &str {
        &self.url
    }
}
