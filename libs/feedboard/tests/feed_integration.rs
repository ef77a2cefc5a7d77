//! End-to-end tests for the transaction feed against a local mock of the
//! blockchain.info push endpoint.

mod common;

use common::{utx, wait_until, MockBlockchain};
use feedboard::{Btc, TransactionFeed, HISTORY_CAPACITY};
use hypersockets::{ClientEvent, ConnectionState};
use std::time::Duration;

const WAIT: Duration = Duration::from_secs(5);

fn latest_source(feed: &TransactionFeed) -> Option<String> {
    feed.ledger().read().latest().map(|record| record.source.clone())
}

async fn unused_ws_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("ws://{}", addr)
}

#[tokio::test]
async fn start_subscribes_and_records_transactions() {
    let frames = vec![utx("A", "B", &[100_000_000, 50_000_000]), utx("C", "D", &[1])];
    let server = MockBlockchain::with_frames(frames).await;
    let mut feed = TransactionFeed::new(server.ws_url());

    assert!(feed.start().await.unwrap());
    assert!(wait_until(WAIT, || feed.ledger().read().len() == 2).await);

    assert_eq!(server.requests(), vec![r#"{"op":"unconfirmed_sub"}"#.to_string()]);
    assert_eq!(feed.state(), ConnectionState::Connected);
    assert_eq!(feed.try_recv_event(), Some(ClientEvent::Connected));

    let snapshot = feed.snapshot();
    assert_eq!(snapshot.records[0].source, "C");
    assert_eq!(snapshot.records[1].source, "A");
    assert_eq!(snapshot.records[1].destination, "B");
    assert_eq!(snapshot.records[1].amount, Btc::from_sats(150_000_000));
    assert_eq!(snapshot.total, Btc::from_sats(150_000_001));

    feed.stop().await.unwrap();
}

#[tokio::test]
async fn start_while_live_keeps_single_connection() {
    let server = MockBlockchain::with_frames(Vec::new()).await;
    let mut feed = TransactionFeed::new(server.ws_url());

    assert!(feed.start().await.unwrap());
    assert!(!feed.start().await.unwrap());
    assert!(wait_until(WAIT, || feed.state() == ConnectionState::Connected).await);
    assert!(!feed.start().await.unwrap());

    assert_eq!(server.connection_count(), 1);

    feed.stop().await.unwrap();
}

#[tokio::test]
async fn stop_closes_normally_and_keeps_history() {
    let server = MockBlockchain::with_frames(vec![utx("A", "B", &[10])]).await;
    let mut feed = TransactionFeed::new(server.ws_url());

    feed.start().await.unwrap();
    assert!(wait_until(WAIT, || feed.ledger().read().len() == 1).await);

    assert!(feed.stop().await.unwrap());
    assert_eq!(feed.state(), ConnectionState::Disconnected);
    assert!(wait_until(WAIT, || server.close_codes() == vec![1000]).await);

    assert_eq!(feed.snapshot().total, Btc::from_sats(10));
    assert!(!feed.stop().await.unwrap());
}

#[tokio::test]
async fn reset_stops_and_clears() {
    let frames = vec![utx("A", "B", &[10]), utx("C", "D", &[20])];
    let server = MockBlockchain::with_frames(frames).await;
    let mut feed = TransactionFeed::new(server.ws_url());

    feed.start().await.unwrap();
    assert!(wait_until(WAIT, || feed.ledger().read().len() == 2).await);

    feed.reset().await.unwrap();

    assert_eq!(feed.state(), ConnectionState::Disconnected);
    let snapshot = feed.snapshot();
    assert!(snapshot.records.is_empty());
    assert_eq!(snapshot.total, Btc::ZERO);
    assert!(wait_until(WAIT, || server.close_codes() == vec![1000]).await);
}

#[tokio::test]
async fn twenty_five_pushes_keep_newest_twenty() {
    let frames = (1..=25u64)
        .map(|n| utx(&format!("src-{n}"), &format!("dst-{n}"), &[n * 1_000]))
        .collect();
    let server = MockBlockchain::with_frames(frames).await;
    let mut feed = TransactionFeed::new(server.ws_url());

    feed.start().await.unwrap();
    assert!(wait_until(WAIT, || latest_source(&feed).as_deref() == Some("src-25")).await);

    let snapshot = feed.snapshot();
    assert_eq!(snapshot.records.len(), HISTORY_CAPACITY);
    assert_eq!(snapshot.records.last().map(|r| r.source.as_str()), Some("src-6"));
    assert_eq!(snapshot.total, Btc::from_sats(310_000));

    feed.stop().await.unwrap();
}

#[tokio::test]
async fn malformed_and_foreign_frames_are_skipped() {
    let frames = vec![
        r#"{"op":"pong"}"#.to_string(),
        "{broken".to_string(),
        r#"{"op":"utx","x":{"inputs":[]}}"#.to_string(),
        r#"{"op":"utx","x":{"inputs":[],"out":[{"value":5}]}}"#.to_string(),
        utx("A", "B", &[7]),
    ];
    let server = MockBlockchain::with_frames(frames).await;
    let mut feed = TransactionFeed::new(server.ws_url());

    feed.start().await.unwrap();
    assert!(wait_until(WAIT, || latest_source(&feed).as_deref() == Some("A")).await);

    let snapshot = feed.snapshot();
    assert_eq!(snapshot.records.len(), 2);
    assert_eq!(snapshot.records[1].source, "Unknown");
    assert_eq!(snapshot.records[1].destination, "Unknown");
    assert_eq!(snapshot.total, Btc::from_sats(12));

    let metrics = feed.metrics().unwrap();
    assert_eq!(metrics.messages_received, 5);
    assert_eq!(metrics.messages_discarded, 3);

    feed.stop().await.unwrap();
}

#[tokio::test]
async fn failed_connection_can_be_restarted() {
    let mut feed = TransactionFeed::new(unused_ws_url().await);

    assert!(feed.start().await.unwrap());
    assert!(wait_until(WAIT, || feed.state() == ConnectionState::Disconnected).await);
    assert!(matches!(feed.try_recv_event(), Some(ClientEvent::Error(_))));

    // The dead client is replaced rather than ignored
    assert!(feed.start().await.unwrap());
    feed.stop().await.unwrap();
    assert_eq!(feed.state(), ConnectionState::Disconnected);
}
