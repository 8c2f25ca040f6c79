//! Error type shared by the ledger core, configuration and HTTP layer.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    /// The chain has no blocks. Unreachable once a ledger is constructed.
    #[error("chain is empty")]
    EmptyChain,

    /// A block payload is missing a required field or carries one of the wrong type.
    #[error("malformed block: {0}")]
    MalformedBlock(String),

    /// Difficulty must be between 1 and the number of hex digits in a digest.
    #[error("invalid difficulty {0} (expected 1..=64)")]
    InvalidDifficulty(u32),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, LedgerError>;
