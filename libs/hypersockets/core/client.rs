use crate::config::ClientConfig;
use crate::connection_state::{AtomicConnectionState, AtomicMetrics, ConnectionState};
use crate::traits::*;
use crossbeam_channel::{unbounded, Receiver, Sender};
use futures::{SinkExt, StreamExt};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};
use tracing::{debug, error, info, trace, warn};

/// Reason sent with the normal-closure close frame
const CLOSE_REASON: &str = "Client closing connection";

/// How often the message loop re-checks the running flag
const FLAG_CHECK_INTERVAL: Duration = Duration::from_millis(100);

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsWrite = futures::stream::SplitSink<WsStream, Message>;
type WsRead = futures::stream::SplitStream<WsStream>;

/// Internal command messages for client control
#[derive(Debug)]
enum ClientCommand {
    /// Send a message to the WebSocket
    Send(WsMessage),
    /// Close the connection with a normal-closure frame
    Close,
}

/// Lifecycle events emitted by the client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    /// Handshake completed
    Connected,
    /// An established connection ended
    Disconnected,
    /// Handshake or transport error
    Error(String),
}

/// Client metrics snapshot
#[derive(Debug, Clone)]
pub struct Metrics {
    pub messages_sent: u64,
    pub messages_received: u64,
    pub messages_discarded: u64,
    pub connection_state: ConnectionState,
}

/// WebSocket client owning exactly one connection attempt
///
/// - The connection lifecycle is an explicit atomic [`ConnectionState`]
/// - Frames are parsed in arrival order and routed to per-route handler threads
/// - There is no automatic reconnection: once the state falls back to
///   `Disconnected` the client is spent and a new one must be built
///
/// # Type Parameters
/// - `R`: MessageRouter implementation
/// - `M`: Message type (determined by router)
pub struct WebSocketClient<R, M>
where
    R: MessageRouter<Message = M>,
    M: Send + std::fmt::Debug + 'static,
{
    config: Arc<ClientConfig<R, M>>,
    state: Arc<AtomicConnectionState>,
    metrics: Arc<AtomicMetrics>,
    command_tx: mpsc::UnboundedSender<ClientCommand>,
    event_rx: Receiver<ClientEvent>,
    /// I/O task handle
    task_handle: Option<tokio::task::JoinHandle<()>>,
    /// Handler thread handles (dedicated OS threads for message processing)
    pub(crate) handler_handles: Vec<std::thread::JoinHandle<()>>,
}

impl<R, M> WebSocketClient<R, M>
where
    R: MessageRouter<Message = M>,
    M: Send + std::fmt::Debug + 'static,
{
    /// Create a new WebSocket client from configuration
    ///
    /// This is called by the builder's `build()` method.
    /// Use `hypersockets::builder()` to create a client.
    pub(crate) async fn new(config: ClientConfig<R, M>) -> Result<Self> {
        let config = Arc::new(config);
        // Connecting from the moment the handle exists
        let state = Arc::new(AtomicConnectionState::new(ConnectionState::Connecting));
        let metrics = Arc::new(AtomicMetrics::new());

        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = unbounded();

        let task_handle = {
            let config = Arc::clone(&config);
            let state = Arc::clone(&state);
            let metrics = Arc::clone(&metrics);

            tokio::spawn(async move {
                run_client(config, state, metrics, command_rx, event_tx).await;
            })
        };

        Ok(Self {
            config,
            state,
            metrics,
            command_tx,
            event_rx,
            task_handle: Some(task_handle),
            handler_handles: Vec::new(), // Builder will populate this
        })
    }

    /// Send a message through the WebSocket
    ///
    /// Messages sent while the handshake is in flight are delivered right
    /// after the subscriptions.
    pub fn send(&self, message: WsMessage) -> Result<()> {
        if !self.state.get().is_live() {
            return Err(HyperSocketError::InvalidState(
                "cannot send on a disconnected client".into(),
            ));
        }
        self.command_tx
            .send(ClientCommand::Send(message))
            .map_err(|e| HyperSocketError::ChannelSend(e.to_string()))
    }

    /// Target URL
    pub fn url(&self) -> &str {
        self.config.url()
    }

    /// Get current connection state
    #[inline]
    pub fn connection_state(&self) -> ConnectionState {
        self.state.get()
    }

    /// Check if connected
    #[inline]
    pub fn is_connected(&self) -> bool {
        self.state.is_connected()
    }

    /// Get current metrics
    pub fn metrics(&self) -> Metrics {
        Metrics {
            messages_sent: self.metrics.messages_sent(),
            messages_received: self.metrics.messages_received(),
            messages_discarded: self.metrics.messages_discarded(),
            connection_state: self.state.get(),
        }
    }

    /// Try to receive an event (non-blocking)
    pub fn try_recv_event(&self) -> Option<ClientEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Receive an event (blocking)
    pub fn recv_event(&self) -> std::result::Result<ClientEvent, crossbeam_channel::RecvError> {
        self.event_rx.recv()
    }

    /// Close the connection and stop all handlers
    ///
    /// The state becomes `Disconnected` before anything else happens; the
    /// close frame is sent without waiting for the peer's acknowledgement.
    /// When this returns no handler will run again.
    pub async fn shutdown(mut self) -> Result<()> {
        info!("Shutting down WebSocket client");

        self.config.shutdown_flag.store(false, Ordering::Release);
        self.state.set(ConnectionState::Disconnected);

        let _ = self.command_tx.send(ClientCommand::Close);

        if let Some(handle) = self.task_handle.take() {
            let _ = handle.await;
        }

        let handles = std::mem::take(&mut self.handler_handles);
        debug!("Waiting for {} handler threads to complete", handles.len());
        let joined = tokio::task::spawn_blocking(move || {
            for handle in handles {
                let _ = handle.join();
            }
        })
        .await;

        if joined.is_err() {
            warn!("Handler threads did not join cleanly");
        }

        info!("All handlers shut down successfully");
        Ok(())
    }
}

impl<R, M> Drop for WebSocketClient<R, M>
where
    R: MessageRouter<Message = M>,
    M: Send + std::fmt::Debug + 'static,
{
    fn drop(&mut self) {
        // A dropped handle must not leave the I/O task running
        self.config.shutdown_flag.store(false, Ordering::Release);
        let _ = self.command_tx.send(ClientCommand::Close);
    }
}

/// I/O task: one handshake, then the message loop until close
async fn run_client<R, M>(
    config: Arc<ClientConfig<R, M>>,
    state: Arc<AtomicConnectionState>,
    metrics: Arc<AtomicMetrics>,
    mut command_rx: mpsc::UnboundedReceiver<ClientCommand>,
    event_tx: Sender<ClientEvent>,
) where
    R: MessageRouter<Message = M>,
    M: Send + std::fmt::Debug + 'static,
{
    debug!("Connecting to {}", config.url);

    let mut pending = Vec::new();
    let connect = connect_async(config.url.as_str());
    tokio::pin!(connect);

    let ws_stream = loop {
        tokio::select! {
            result = &mut connect => match result {
                Ok((ws_stream, _)) => break ws_stream,
                Err(e) => {
                    error!("Failed to connect to {}: {}", config.url, e);
                    state.set(ConnectionState::Disconnected);
                    let _ = event_tx.send(ClientEvent::Error(e.to_string()));
                    return;
                }
            },
            cmd = command_rx.recv() => match cmd {
                Some(ClientCommand::Send(msg)) => pending.push(msg),
                Some(ClientCommand::Close) | None => {
                    debug!("Close requested during handshake, abandoning connection");
                    state.set(ConnectionState::Disconnected);
                    return;
                }
            }
        }
    };

    // A stop issued while the handshake was completing wins
    if !state.transition(ConnectionState::Connecting, ConnectionState::Connected) {
        debug!("Client stopped during handshake, closing fresh connection");
        let (mut write, _) = ws_stream.split();
        let _ = write.send(close_message()).await;
        return;
    }

    info!("Connected to {}", config.url);
    let _ = event_tx.send(ClientEvent::Connected);

    let result = handle_connection(ws_stream, &config, &metrics, &mut command_rx, pending).await;
    if let Err(e) = result {
        error!("Connection error: {}", e);
        let _ = event_tx.send(ClientEvent::Error(e.to_string()));
    }

    state.set(ConnectionState::Disconnected);
    let _ = event_tx.send(ClientEvent::Disconnected);

    info!("Client task exiting");
}

/// Send subscriptions, then pump frames until close
async fn handle_connection<R, M>(
    ws_stream: WsStream,
    config: &Arc<ClientConfig<R, M>>,
    metrics: &Arc<AtomicMetrics>,
    command_rx: &mut mpsc::UnboundedReceiver<ClientCommand>,
    pending: Vec<WsMessage>,
) -> Result<()>
where
    R: MessageRouter<Message = M>,
    M: Send + std::fmt::Debug + 'static,
{
    let (mut write, mut read) = ws_stream.split();

    for sub in config.subscriptions.iter().chain(pending.iter()) {
        write.send(ws_message_to_tungstenite(sub)).await.map_err(|e| {
            HyperSocketError::WebSocket(format!("Failed to send subscription: {}", e))
        })?;
        metrics.increment_sent();
        debug!("Sent subscription message");
    }

    message_loop(&mut write, &mut read, config, metrics, command_rx).await
}

/// Main message processing loop
async fn message_loop<R, M>(
    write: &mut WsWrite,
    read: &mut WsRead,
    config: &Arc<ClientConfig<R, M>>,
    metrics: &Arc<AtomicMetrics>,
    command_rx: &mut mpsc::UnboundedReceiver<ClientCommand>,
) -> Result<()>
where
    R: MessageRouter<Message = M>,
    M: Send + std::fmt::Debug + 'static,
{
    let shutdown_flag = &config.shutdown_flag;
    let mut flag_check = tokio::time::interval(FLAG_CHECK_INTERVAL);

    loop {
        tokio::select! {
            msg = read.next() => {
                match msg {
                    Some(Ok(Message::Close(frame))) => {
                        info!("Server closed connection: {:?}", frame);
                        return Ok(());
                    }
                    Some(Ok(msg)) => {
                        metrics.increment_received();

                        if let Some(ws_msg) = tungstenite_to_ws_message(msg) {
                            route_message(config, metrics, ws_msg).await;
                        }
                    }
                    Some(Err(e)) => {
                        error!("WebSocket error: {}", e);
                        return Err(HyperSocketError::WebSocket(e.to_string()));
                    }
                    None => {
                        warn!("WebSocket stream closed");
                        return Err(HyperSocketError::ConnectionClosed("Stream ended".into()));
                    }
                }
            }

            cmd = command_rx.recv() => {
                match cmd {
                    Some(ClientCommand::Send(msg)) => {
                        write.send(ws_message_to_tungstenite(&msg)).await.map_err(|e| {
                            HyperSocketError::WebSocket(e.to_string())
                        })?;
                        metrics.increment_sent();
                    }
                    Some(ClientCommand::Close) | None => {
                        info!("Closing connection (normal closure)");
                        let _ = write.send(close_message()).await;
                        return Ok(());
                    }
                }
            }

            _ = flag_check.tick() => {
                if !shutdown_flag.load(Ordering::Acquire) {
                    debug!("Shutdown flag detected in message loop, closing connection");
                    let _ = write.send(close_message()).await;
                    return Ok(());
                }
            }
        }
    }
}

/// Parse one frame and hand it to its route's handler
///
/// Runs inline in the message loop so routing follows arrival order.
async fn route_message<R, M>(
    config: &Arc<ClientConfig<R, M>>,
    metrics: &AtomicMetrics,
    ws_msg: WsMessage,
)
where
    R: MessageRouter<Message = M>,
    M: Send + std::fmt::Debug + 'static,
{
    if !config.shutdown_flag.load(Ordering::Acquire) {
        debug!("Shutdown detected, skipping message parsing");
        return;
    }

    match config.router.parse(ws_msg).await {
        Ok(Some(message)) => {
            let route_key = config.router.route_key(&message);

            match config.route_senders.get(&route_key) {
                Some(sender) => {
                    // Send only fails once the handler has exited during shutdown
                    let _ = sender.send(message);
                }
                None => {
                    metrics.increment_discarded();
                    debug!("No handler configured for route key: {:?}", route_key);
                }
            }
        }
        Ok(None) => {
            metrics.increment_discarded();
            trace!("Router discarded message");
        }
        Err(e) => {
            metrics.increment_discarded();
            warn!("Discarding malformed message: {}", e);
        }
    }
}

fn close_message() -> Message {
    Message::Close(Some(CloseFrame {
        code: CloseCode::Normal,
        reason: CLOSE_REASON.into(),
    }))
}

/// Convert WsMessage to tungstenite Message
fn ws_message_to_tungstenite(msg: &WsMessage) -> Message {
    match msg {
        WsMessage::Text(text) => Message::Text(text.clone()),
        WsMessage::Binary(data) => Message::Binary(data.clone()),
    }
}

/// Convert tungstenite Message to WsMessage
fn tungstenite_to_ws_message(msg: Message) -> Option<WsMessage> {
    match msg {
        Message::Text(text) => Some(WsMessage::Text(text)),
        Message::Binary(data) => Some(WsMessage::Binary(data)),
        Message::Ping(_) | Message::Pong(_) | Message::Close(_) | Message::Frame(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_close_message_is_normal_closure() {
        match close_message() {
            Message::Close(Some(frame)) => {
                assert_eq!(frame.code, CloseCode::Normal);
                assert_eq!(frame.reason, CLOSE_REASON);
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[test]
    fn test_message_conversion_keeps_payload() {
        let text = ws_message_to_tungstenite(&WsMessage::text("hello"));
        assert_eq!(tungstenite_to_ws_message(text), Some(WsMessage::text("hello")));

        let binary = ws_message_to_tungstenite(&WsMessage::Binary(vec![7, 8]));
        assert_eq!(tungstenite_to_ws_message(binary), Some(WsMessage::Binary(vec![7, 8])));
    }

    #[test]
    fn test_control_frames_are_not_routed() {
        assert_eq!(tungstenite_to_ws_message(Message::Ping(vec![1])), None);
        assert_eq!(tungstenite_to_ws_message(Message::Pong(vec![1])), None);
    }
}
