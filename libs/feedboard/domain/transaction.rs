use super::amount::Btc;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// One unconfirmed transaction as shown in the feed
///
/// Built once from an inbound event and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionRecord {
    /// Address of the first input, or "Unknown"
    pub source: String,
    /// Address of the first output, or "Unknown"
    pub destination: String,
    /// Sum of every output value
    pub amount: Btc,
    /// Arrival time at this client
    pub received_at: DateTime<Utc>,
}

impl TransactionRecord {
    /// Create a record stamped with the current time
    pub fn new(source: impl Into<String>, destination: impl Into<String>, amount: Btc) -> Self {
        Self::with_received_at(source, destination, amount, Utc::now())
    }

    pub fn with_received_at(
        source: impl Into<String>,
        destination: impl Into<String>,
        amount: Btc,
        received_at: DateTime<Utc>,
    ) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            amount,
            received_at,
        }
    }
}
