//! blockchain.info WebSocket message types
//!
//! Only `utx` (unconfirmed transaction) pushes are consumed:
//! ```json
//! {
//!     "op": "utx",
//!     "x": {
//!         "inputs": [{ "prev_out": { "addr": "1A1z...", "value": 5000 } }],
//!         "out": [{ "addr": "1BvB...", "value": 4000 }]
//!     }
//! }
//! ```

use crate::domain::{Btc, TransactionRecord};
use serde::Deserialize;
use thiserror::Error;

/// Control op requesting the unconfirmed-transaction stream
pub const UNCONFIRMED_SUB_OP: &str = "unconfirmed_sub";

/// Op carried by every unconfirmed-transaction push
pub const UNCONFIRMED_TX_OP: &str = "utx";

/// Party shown when an address cannot be determined
pub const UNKNOWN_PARTY: &str = "Unknown";

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("output values overflow")]
    ValueOverflow,
}

/// Subscription request sent right after the connection opens
pub fn subscribe_message() -> String {
    serde_json::json!({ "op": UNCONFIRMED_SUB_OP }).to_string()
}

/// Just the `op` field; used to discard other kinds before full decoding
#[derive(Debug, Deserialize)]
struct OpEnvelope {
    op: String,
}

#[derive(Debug, Deserialize)]
struct UtxMessage {
    x: UnconfirmedTx,
}

/// Payload of a `utx` push
#[derive(Debug, Clone, Deserialize)]
pub struct UnconfirmedTx {
    pub inputs: Vec<TxInput>,
    pub out: Vec<TxOutput>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TxInput {
    #[serde(default)]
    pub prev_out: Option<PrevOut>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PrevOut {
    #[serde(default)]
    pub addr: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TxOutput {
    #[serde(default)]
    pub addr: Option<String>,
    /// Satoshis
    pub value: u64,
}

/// Unknown-party rule: absent, null or empty addresses all become "Unknown"
pub fn resolve_party(addr: Option<&str>) -> &str {
    match addr {
        Some(addr) if !addr.is_empty() => addr,
        _ => UNKNOWN_PARTY,
    }
}

impl UnconfirmedTx {
    /// Address spending the first input
    pub fn source(&self) -> &str {
        resolve_party(
            self.inputs
                .first()
                .and_then(|input| input.prev_out.as_ref())
                .and_then(|prev| prev.addr.as_deref()),
        )
    }

    /// Address receiving the first output
    pub fn destination(&self) -> &str {
        resolve_party(self.out.first().and_then(|output| output.addr.as_deref()))
    }

    /// Sum of every output value
    pub fn total_out(&self) -> Result<Btc, DecodeError> {
        self.out.iter().try_fold(Btc::ZERO, |total, output| {
            total
                .checked_add(Btc::from_sats(output.value))
                .ok_or(DecodeError::ValueOverflow)
        })
    }

    pub fn to_record(&self) -> Result<TransactionRecord, DecodeError> {
        Ok(TransactionRecord::new(
            self.source(),
            self.destination(),
            self.total_out()?,
        ))
    }
}

/// Decode one inbound text frame
///
/// # Returns
/// * `Ok(Some(record))` - an unconfirmed transaction
/// * `Ok(None)` - a well-formed message of another kind (kind-mismatch rule)
/// * `Err(DecodeError)` - malformed JSON or a `utx` missing required fields
pub fn parse_event(text: &str) -> Result<Option<TransactionRecord>, DecodeError> {
    let envelope: OpEnvelope = serde_json::from_str(text)?;
    if envelope.op != UNCONFIRMED_TX_OP {
        return Ok(None);
    }

    let message: UtxMessage = serde_json::from_str(text)?;
    message.x.to_record().map(Some)
}
