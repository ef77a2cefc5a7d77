//! blockchain.info unconfirmed-transaction feed
//!
//! - `types`: wire format and the decoding rules
//! - `websocket`: router, ledger handler and client builder

pub mod types;
pub mod websocket;

pub use types::{parse_event, subscribe_message, DecodeError, UnconfirmedTx, UNKNOWN_PARTY};
pub use websocket::{
    build_feed_client, log_client_event, FeedClient, FeedRoute, FeedRouter, LedgerHandler,
    BLOCKCHAIN_WS_URL,
};
