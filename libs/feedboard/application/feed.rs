//! Live unconfirmed-transaction feed
//!
//! Owns at most one WebSocket client and the ledger it writes into. The
//! ledger outlives connections: `stop` keeps the history, `reset` clears it.

use crate::domain::{Ledger, LedgerSnapshot, SharedLedger};
use crate::error::Result;
use crate::infrastructure::client::blockchain::{build_feed_client, FeedClient};
use crate::infrastructure::config::FeedConfig;
use hypersockets::{ClientEvent, ConnectionState, Metrics};
use std::sync::Arc;
use tracing::{debug, info};

pub struct TransactionFeed {
    url: String,
    ledger: SharedLedger,
    client: Option<FeedClient>,
}

impl TransactionFeed {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ledger: Ledger::shared(),
            client: None,
        }
    }

    pub fn from_config(config: &FeedConfig) -> Self {
        Self::new(config.ws_url.clone())
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Connection state; `Disconnected` when no client exists
    pub fn state(&self) -> ConnectionState {
        self.client
            .as_ref()
            .map(|client| client.connection_state())
            .unwrap_or(ConnectionState::Disconnected)
    }

    /// Open a connection unless one is already connecting or connected
    ///
    /// Returns `true` when a new client was created. The call returns while
    /// the handshake is still in progress; watch [`Self::state`] or the
    /// event stream for the outcome.
    pub async fn start(&mut self) -> Result<bool> {
        if self.state().is_live() {
            debug!("[Feed] Already {}, start ignored", self.state());
            return Ok(false);
        }

        // A client whose connection died is still holding its threads
        if let Some(dead) = self.client.take() {
            debug!("[Feed] Reaping closed connection");
            dead.shutdown().await?;
        }

        info!("[Feed] Connecting to {}", self.url);
        let client = build_feed_client(&self.url, Arc::clone(&self.ledger)).await?;
        self.client = Some(client);

        Ok(true)
    }

    /// Close the connection with a normal closure
    ///
    /// Returns `false` when there was nothing to stop. Once this returns no
    /// further transaction reaches the ledger.
    pub async fn stop(&mut self) -> Result<bool> {
        let Some(client) = self.client.take() else {
            return Ok(false);
        };

        info!("[Feed] Closing connection");
        client.shutdown().await?;
        Ok(true)
    }

    /// Stop, then empty the ledger
    pub async fn reset(&mut self) -> Result<()> {
        self.stop().await?;
        self.ledger.write().clear();
        info!("[Feed] Ledger cleared");
        Ok(())
    }

    /// Shared handle to the ledger
    pub fn ledger(&self) -> SharedLedger {
        Arc::clone(&self.ledger)
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        self.ledger.read().snapshot()
    }

    /// Next pending connection event, if any
    pub fn try_recv_event(&self) -> Option<ClientEvent> {
        self.client.as_ref().and_then(|client| client.try_recv_event())
    }

    /// Counters of the current connection
    pub fn metrics(&self) -> Option<Metrics> {
        self.client.as_ref().map(|client| client.metrics())
    }
}
