//! Domain Layer
//!
//! Pure entities: amounts, transaction records, the bounded ledger and
//! layout elements. No I/O happens here.

pub mod amount;
pub mod layout;
pub mod ledger;
pub mod transaction;

pub use amount::Btc;
pub use layout::{
    clamp_size, default_layout, LayoutElement, DEFAULT_ELEMENT_COUNT, MIN_ELEMENT_SIZE,
};
pub use ledger::{Ledger, LedgerSnapshot, SharedLedger, HISTORY_CAPACITY};
pub use transaction::TransactionRecord;
