//! Test fixtures for the feedboard integration tests
//!
//! `MockBlockchain` speaks just enough of the blockchain.info push protocol:
//! once a client sends `{"op":"unconfirmed_sub"}` it pushes the scripted
//! frames on that connection.

#![allow(dead_code)]

use futures::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tokio_tungstenite::tungstenite::Message;

const SUBSCRIBE: &str = r#"{"op":"unconfirmed_sub"}"#;

#[derive(Default)]
struct Observed {
    requests: Vec<String>,
    close_codes: Vec<u16>,
    connections: usize,
}

pub struct MockBlockchain {
    addr: SocketAddr,
    stop: Arc<Notify>,
    observed: Arc<Mutex<Observed>>,
}

impl MockBlockchain {
    pub async fn with_frames(frames: Vec<String>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let stop = Arc::new(Notify::new());
        let observed = Arc::new(Mutex::new(Observed::default()));

        let server = Self {
            addr,
            stop: Arc::clone(&stop),
            observed: Arc::clone(&observed),
        };

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    accepted = listener.accept() => {
                        let Ok((stream, _)) = accepted else { break };
                        observed.lock().unwrap().connections += 1;
                        tokio::spawn(serve(stream, frames.clone(), Arc::clone(&observed)));
                    }
                    _ = stop.notified() => break,
                }
            }
        });

        server
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}", self.addr)
    }

    pub fn requests(&self) -> Vec<String> {
        self.observed.lock().unwrap().requests.clone()
    }

    pub fn close_codes(&self) -> Vec<u16> {
        self.observed.lock().unwrap().close_codes.clone()
    }

    pub fn connection_count(&self) -> usize {
        self.observed.lock().unwrap().connections
    }
}

impl Drop for MockBlockchain {
    fn drop(&mut self) {
        self.stop.notify_waiters();
    }
}

async fn serve(stream: tokio::net::TcpStream, frames: Vec<String>, observed: Arc<Mutex<Observed>>) {
    let Ok(ws) = tokio_tungstenite::accept_async(stream).await else {
        return;
    };
    let (mut write, mut read) = ws.split();

    while let Some(Ok(message)) = read.next().await {
        match message {
            Message::Text(text) => {
                let subscribed = text == SUBSCRIBE;
                observed.lock().unwrap().requests.push(text);
                if subscribed {
                    for frame in &frames {
                        if write.send(Message::Text(frame.clone())).await.is_err() {
                            return;
                        }
                    }
                }
            }
            Message::Close(frame) => {
                if let Some(frame) = frame {
                    observed.lock().unwrap().close_codes.push(u16::from(frame.code));
                }
                break;
            }
            _ => {}
        }
    }
}

/// A `utx` push with one input and the given output values in satoshis
pub fn utx(source: &str, destination: &str, values: &[u64]) -> String {
    let outputs: Vec<String> = values
        .iter()
        .enumerate()
        .map(|(i, value)| {
            if i == 0 {
                format!(r#"{{"addr":"{destination}","value":{value}}}"#)
            } else {
                format!(r#"{{"addr":"change-{i}","value":{value}}}"#)
            }
        })
        .collect();

    format!(
        r#"{{"op":"utx","x":{{"hash":"h","inputs":[{{"prev_out":{{"addr":"{source}","value":0}}}}],"out":[{}]}}}}"#,
        outputs.join(",")
    )
}

/// Poll `condition` every 10ms until it holds or `timeout` passes
pub async fn wait_until(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    condition()
}
