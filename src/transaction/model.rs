use serde::{Deserialize, Serialize};

/// A value transfer waiting to be committed into a block.
///
/// The core does not check the parties or the amount; callers that need
/// rules (non-empty addresses, positive amounts) enforce them before
/// submitting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub sender: String,
    pub recipient: String,
    pub amount: i64,
}

impl Transaction {
    pub fn new(sender: impl Into<String>, recipient: impl Into<String>, amount: i64) -> Self {
        Self {
            sender: sender.into(),
            recipient: recipient.into(),
            amount,
        }
    }
}
