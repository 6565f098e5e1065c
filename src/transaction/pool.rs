use super::model::Transaction;
use crate::error::Result;

/// Pending transactions waiting to be included in the next mined block.
/// Order is submission order; the pool is emptied exactly once per mined
/// block, when the owning ledger drains it into the new block.
#[derive(Debug, Default)]
pub struct TransactionPool {
    pending: Vec<Transaction>,
}

impl TransactionPool {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
        }
    }

    /// Validate and queue a transaction. Rejected transactions never
    /// enter the pool.
    pub fn add(&mut self, tx: Transaction) -> Result<()> {
        tx.validate()?;
        self.pending.push(tx);
        Ok(())
    }

    /// Return every pending transaction and leave the pool empty.
    pub fn drain(&mut self) -> Vec<Transaction> {
        std::mem::take(&mut self.pending)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn as_slice(&self) -> &[Transaction] {
        &self.pending
    }
}
