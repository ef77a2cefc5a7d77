//! Common test utilities for HyperSockets integration tests
//!
//! Provides a scripted mock WebSocket server and polling helpers.

#![allow(dead_code)]

use futures::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tokio_tungstenite::tungstenite::Message;

/// Macro for verbose test output (controlled by TEST_VERBOSE env var)
#[macro_export]
macro_rules! verbose_println {
    ($($arg:tt)*) => {
        if std::env::var("TEST_VERBOSE").is_ok() {
            println!($($arg)*);
        }
    };
}

/// A mock WebSocket server that records what clients send
///
/// After the first text frame from a client (the subscription), the server
/// pushes every scripted frame, in order, on that connection.
pub struct MockWsServer {
    pub addr: SocketAddr,
    shutdown: Arc<Notify>,
    received: Arc<Mutex<Vec<String>>>,
    close_codes: Arc<Mutex<Vec<u16>>>,
    connections: Arc<Mutex<usize>>,
}

impl MockWsServer {
    /// Start a server that only records traffic
    pub async fn start() -> Self {
        Self::with_script(Vec::new()).await
    }

    /// Start a server that answers the first client text frame with `script`
    pub async fn with_script(script: Vec<String>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let shutdown = Arc::new(Notify::new());
        let received = Arc::new(Mutex::new(Vec::new()));
        let close_codes = Arc::new(Mutex::new(Vec::new()));
        let connections = Arc::new(Mutex::new(0));

        let server = Self {
            addr,
            shutdown: Arc::clone(&shutdown),
            received: Arc::clone(&received),
            close_codes: Arc::clone(&close_codes),
            connections: Arc::clone(&connections),
        };

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    result = listener.accept() => {
                        match result {
                            Ok((stream, _)) => {
                                *connections.lock().unwrap() += 1;
                                let shutdown = Arc::clone(&shutdown);
                                let received = Arc::clone(&received);
                                let close_codes = Arc::clone(&close_codes);
                                let script = script.clone();
                                tokio::spawn(async move {
                                    Self::handle_connection(
                                        stream,
                                        shutdown,
                                        received,
                                        close_codes,
                                        script,
                                    )
                                    .await;
                                });
                            }
                            Err(e) => {
                                eprintln!("Accept error: {}", e);
                                break;
                            }
                        }
                    }
                    _ = shutdown.notified() => {
                        break;
                    }
                }
            }
        });

        server
    }

    async fn handle_connection(
        stream: tokio::net::TcpStream,
        shutdown: Arc<Notify>,
        received: Arc<Mutex<Vec<String>>>,
        close_codes: Arc<Mutex<Vec<u16>>>,
        script: Vec<String>,
    ) {
        let ws_stream = match tokio_tungstenite::accept_async(stream).await {
            Ok(ws) => ws,
            Err(e) => {
                eprintln!("WebSocket handshake failed: {}", e);
                return;
            }
        };

        let (mut write, mut read) = ws_stream.split();
        let mut script_sent = false;

        loop {
            tokio::select! {
                msg = read.next() => {
                    match msg {
                        Some(Ok(Message::Text(text))) => {
                            received.lock().unwrap().push(text);
                            if !script_sent {
                                script_sent = true;
                                for frame in &script {
                                    if write.send(Message::Text(frame.clone())).await.is_err() {
                                        return;
                                    }
                                }
                            }
                        }
                        Some(Ok(Message::Close(frame))) => {
                            if let Some(frame) = frame {
                                close_codes.lock().unwrap().push(u16::from(frame.code));
                            }
                            break;
                        }
                        Some(Ok(_)) => {}
                        Some(Err(_)) | None => break,
                    }
                }
                _ = shutdown.notified() => {
                    break;
                }
            }
        }
    }

    /// Get the WebSocket URL for this server
    pub fn ws_url(&self) -> String {
        format!("ws://{}", self.addr)
    }

    /// Text frames received from clients, in arrival order
    pub fn received(&self) -> Vec<String> {
        self.received.lock().unwrap().clone()
    }

    /// Close codes sent by clients
    pub fn close_codes(&self) -> Vec<u16> {
        self.close_codes.lock().unwrap().clone()
    }

    /// Number of accepted TCP connections
    pub fn connection_count(&self) -> usize {
        *self.connections.lock().unwrap()
    }

    /// Shutdown the server
    pub fn shutdown(&self) {
        self.shutdown.notify_waiters();
    }
}

impl Drop for MockWsServer {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Poll `condition` every 10ms until it holds or `timeout` elapses
pub async fn wait_until<F>(timeout: Duration, mut condition: F) -> bool
where
    F: FnMut() -> bool,
{
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    condition()
}

/// An address nothing listens on
pub async fn unused_ws_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("ws://{}", addr)
}
