use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A transfer of value between two identifiers. There are no signatures
/// and no nonces: submissions are taken at face value, and duplicate
/// transactions are not detected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Transaction {
    pub sender: String,
    pub recipient: String,
    pub amount: f64,
}

impl Transaction {
    pub fn new(sender: String, recipient: String, amount: f64) -> Self {
        Self {
            sender,
            recipient,
            amount,
        }
    }

    /// Field-level checks applied before a transaction enters the pool.
    pub fn validate(&self) -> Result<()> {
        if self.sender.trim().is_empty() {
            return Err(Error::Validation("sender is required".to_string()));
        }
        if self.recipient.trim().is_empty() {
            return Err(Error::Validation("recipient is required".to_string()));
        }
        if !self.amount.is_finite() || self.amount < 0.0 {
            return Err(Error::Validation(
                "amount must be a non-negative number".to_string(),
            ));
        }
        Ok(())
    }
}
