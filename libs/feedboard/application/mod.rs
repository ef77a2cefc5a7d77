//! Application Layer
//!
//! Use cases driven by the binaries: the live transaction feed and the
//! persisted workspace layout.

pub mod feed;
pub mod layout_store;

pub use feed::TransactionFeed;
pub use layout_store::LayoutStore;
