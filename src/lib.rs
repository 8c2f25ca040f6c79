//! Single-process proof-of-work ledger: blocks of queued transactions,
//! sealed by a leading-zero hash puzzle and linked by SHA-256.

pub mod api;
pub mod blockchain;
pub mod config;
pub mod error;
pub mod transaction;

pub use error::{LedgerError, Result};
