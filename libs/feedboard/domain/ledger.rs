//! Bounded, newest-first transaction history with a running total

use super::amount::Btc;
use super::transaction::TransactionRecord;
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::Arc;

/// Maximum number of records kept in the history
pub const HISTORY_CAPACITY: usize = 20;

/// Ledger shared between the feed's handler thread and readers
pub type SharedLedger = Arc<RwLock<Ledger>>;

/// Recent transactions, newest first
///
/// Invariants after every public call:
/// - `history.len() <= HISTORY_CAPACITY`
/// - `running_total == sum(history[*].amount)`
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    history: VecDeque<TransactionRecord>,
    running_total: Btc,
}

/// Point-in-time copy of the ledger for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerSnapshot {
    pub records: Vec<TransactionRecord>,
    pub total: Btc,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a ledger behind a shared lock
    pub fn shared() -> SharedLedger {
        Arc::new(RwLock::new(Self::new()))
    }

    /// Prepend a record, evicting the oldest one past capacity
    ///
    /// Returns the evicted record, if any.
    pub fn record(&mut self, record: TransactionRecord) -> Option<TransactionRecord> {
        self.history.push_front(record);

        let evicted = if self.history.len() > HISTORY_CAPACITY {
            self.history.pop_back()
        } else {
            None
        };

        self.recompute_total();
        evicted
    }

    /// Drop every record and zero the total
    pub fn clear(&mut self) {
        self.history.clear();
        self.recompute_total();
    }

    // Summed from scratch so eviction can never leave the total stale
    fn recompute_total(&mut self) {
        self.running_total = self.history.iter().map(|record| record.amount).sum();
    }

    /// Records, newest first
    pub fn history(&self) -> impl Iterator<Item = &TransactionRecord> {
        self.history.iter()
    }

    /// Most recent record
    pub fn latest(&self) -> Option<&TransactionRecord> {
        self.history.front()
    }

    pub fn running_total(&self) -> Btc {
        self.running_total
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            records: self.history.iter().cloned().collect(),
            total: self.running_total,
        }
    }
}
