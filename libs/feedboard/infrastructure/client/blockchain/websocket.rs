//! WebSocket client for the blockchain.info unconfirmed-transaction stream
//!
//! Subscribes with `{"op":"unconfirmed_sub"}` and feeds every `utx` push
//! into the shared [`Ledger`](crate::domain::Ledger).

use super::types::{parse_event, subscribe_message};
use crate::domain::{SharedLedger, TransactionRecord};
use hypersockets::core::*;
use hypersockets::{HyperSocketError, MessageHandler, MessageRouter, WsMessage};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{debug, info, trace, warn};

/// Public push endpoint
pub const BLOCKCHAIN_WS_URL: &str = "wss://ws.blockchain.info/inv";

/// Log a summary line every this many handled transactions
const LOG_EVERY: u64 = 100;

/// Client type owned by the feed
pub type FeedClient = WebSocketClient<FeedRouter, TransactionRecord>;

// =============================================================================
// Router - Parses WebSocket messages
// =============================================================================

/// Single route: every accepted message is a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedRoute {
    Transactions,
}

/// Router turning `utx` pushes into [`TransactionRecord`]s
#[derive(Debug, Default)]
pub struct FeedRouter;

impl FeedRouter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl MessageRouter for FeedRouter {
    type Message = TransactionRecord;
    type RouteKey = FeedRoute;

    async fn parse(&self, message: WsMessage) -> hypersockets::Result<Option<Self::Message>> {
        let text = match message.as_text() {
            Some(t) => t,
            None => {
                debug!("[Blockchain WS] Ignoring binary frame");
                return Ok(None);
            }
        };

        match parse_event(text) {
            Ok(Some(record)) => Ok(Some(record)),
            Ok(None) => {
                trace!("[Blockchain WS] Ignoring non-utx message");
                Ok(None)
            }
            Err(e) => Err(HyperSocketError::ParseError(format!("{e}"))),
        }
    }

    fn route_key(&self, _message: &Self::Message) -> Self::RouteKey {
        FeedRoute::Transactions
    }
}

// =============================================================================
// Handler - Applies transactions to the ledger
// =============================================================================

/// Handler appending each transaction to the shared ledger
pub struct LedgerHandler {
    ledger: SharedLedger,
    message_count: u64,
}

impl LedgerHandler {
    pub fn new(ledger: SharedLedger) -> Self {
        Self {
            ledger,
            message_count: 0,
        }
    }
}

impl MessageHandler<TransactionRecord> for LedgerHandler {
    fn handle(&mut self, record: TransactionRecord) -> hypersockets::Result<()> {
        self.message_count += 1;

        debug!(
            "[Blockchain WS] {} -> {} ({} BTC)",
            record.source, record.destination, record.amount
        );

        let total = {
            let mut ledger = self.ledger.write();
            ledger.record(record);
            ledger.running_total()
        };

        if self.message_count % LOG_EVERY == 0 {
            info!(
                "[Blockchain WS] {} transactions handled, window total {} BTC",
                self.message_count, total
            );
        }

        Ok(())
    }
}

// =============================================================================
// WebSocket Client Builder
// =============================================================================

/// Build a client that subscribes to unconfirmed transactions
///
/// Each client gets its own running flag: shutting one down never affects
/// a later one.
pub async fn build_feed_client(
    url: &str,
    ledger: SharedLedger,
) -> hypersockets::Result<FeedClient> {
    let running = Arc::new(AtomicBool::new(true));
    let handler = LedgerHandler::new(ledger);

    debug!("[Blockchain WS] Connecting to: {}", url);

    WebSocketClientBuilder::new()
        .url(url)
        .router(FeedRouter::new(), move |routing| {
            routing.handler(FeedRoute::Transactions, handler)
        })
        .subscription(WsMessage::Text(subscribe_message()))
        .shutdown_flag(running)
        .build()
        .await
}

/// Log a client event; returns `false` once the connection is gone
pub fn log_client_event(event: &ClientEvent) -> bool {
    match event {
        ClientEvent::Connected => {
            info!("[Blockchain WS] Connected, subscribed to unconfirmed transactions");
            true
        }
        ClientEvent::Disconnected => {
            warn!("[Blockchain WS] Disconnected");
            false
        }
        ClientEvent::Error(err) => {
            warn!("[Blockchain WS] Error: {}", err);
            false
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Btc, Ledger};

    #[tokio::test]
    async fn test_router_accepts_utx() {
        let router = FeedRouter::new();
        let text = r#"{"op":"utx","x":{"inputs":[{"prev_out":{"addr":"A"}}],"out":[{"addr":"B","value":7}]}}"#;

        let record = router.parse(WsMessage::text(text)).await.unwrap().unwrap();
        assert_eq!(record.amount, Btc::from_sats(7));
        assert_eq!(router.route_key(&record), FeedRoute::Transactions);
    }

    #[tokio::test]
    async fn test_router_discards_other_ops_and_binary() {
        let router = FeedRouter::new();
        assert!(router.parse(WsMessage::text(r#"{"op":"pong"}"#)).await.unwrap().is_none());
        assert!(router.parse(WsMessage::Binary(vec![0, 1])).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_router_reports_malformed_as_parse_error() {
        let router = FeedRouter::new();
        let result = router.parse(WsMessage::text("{oops")).await;
        assert!(matches!(result, Err(HyperSocketError::ParseError(_))));
    }

    #[test]
    fn test_handler_records_into_ledger() {
        let ledger = Ledger::shared();
        let mut handler = LedgerHandler::new(Arc::clone(&ledger));

        handler
            .handle(TransactionRecord::new("A", "B", Btc::from_sats(10)))
            .unwrap();
        handler
            .handle(TransactionRecord::new("C", "D", Btc::from_sats(5)))
            .unwrap();

        let ledger = ledger.read();
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.latest().map(|r| r.source.as_str()), Some("C"));
        assert_eq!(ledger.running_total(), Btc::from_sats(15));
    }

    #[test]
    fn test_log_client_event_liveness() {
        assert!(log_client_event(&ClientEvent::Connected));
        assert!(!log_client_event(&ClientEvent::Disconnected));
        assert!(!log_client_event(&ClientEvent::Error("refused".into())));
    }
}
