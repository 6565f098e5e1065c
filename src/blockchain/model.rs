use chrono::Utc;
use log::info;

use super::{Block, ProofOfWork};
use crate::error::Result;
use crate::transaction::{Transaction, TransactionPool};

/// The node's ledger: an append-only chain of blocks plus the pool of
/// transactions waiting for the next one. The chain starts at the genesis
/// block and is only ever extended by mining or swapped wholesale by
/// consensus resolution.
#[derive(Debug)]
pub struct Blockchain {
    chain: Vec<Block>,
    pool: TransactionPool,
    pow: ProofOfWork,
}

impl Default for Blockchain {
    fn default() -> Self {
        Self::new(ProofOfWork::default())
    }
}

impl Blockchain {
    /// Initialize a ledger holding only the genesis block.
    pub fn new(pow: ProofOfWork) -> Self {
        Self {
            chain: vec![Block::genesis()],
            pool: TransactionPool::new(),
            pow,
        }
    }

    pub fn pow(&self) -> ProofOfWork {
        self.pow
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn blocks(&self) -> &[Block] {
        &self.chain
    }

    pub fn pending_transactions(&self) -> &[Transaction] {
        self.pool.as_slice()
    }

    pub fn last_block(&self) -> &Block {
        self.chain
            .last()
            .expect("chain always holds the genesis block")
    }

    /// Queue a transaction for the next mined block and return the index
    /// of the block it will land in.
    pub fn new_transaction(&mut self, tx: Transaction) -> Result<u64> {
        self.pool.add(tx)?;
        Ok(self.last_block().index + 1)
    }

    /// Seal the pending transactions into a new block and append it.
    /// `previous_hash` defaults to the hash of the current last block.
    pub fn new_block(&mut self, proof: u64, previous_hash: Option<String>) -> Block {
        let previous_hash = previous_hash.unwrap_or_else(|| self.last_block().hash());
        let block = Block {
            index: self.chain.len() as u64 + 1,
            timestamp: Utc::now().timestamp_millis(),
            transactions: self.pool.drain(),
            proof,
            previous_hash,
        };
        self.chain.push(block.clone());
        block
    }

    /// Validate an arbitrary candidate chain: every block must link to the
    /// hash of its predecessor and carry a proof accepted against the
    /// predecessor's proof. False on the first violation or on an empty
    /// candidate. Pure, usable on local and peer chains alike.
    pub fn valid_chain(candidate: &[Block], pow: &ProofOfWork) -> bool {
        if candidate.is_empty() {
            return false;
        }

        for i in 1..candidate.len() {
            let prev = &candidate[i - 1];
            let current = &candidate[i];

            if current.previous_hash != prev.hash() {
                return false;
            }
            if !pow.valid(prev.proof, current.proof) {
                return false;
            }
        }

        true
    }

    pub fn is_valid(&self) -> bool {
        Self::valid_chain(&self.chain, &self.pow)
    }

    /// Wholesale chain replacement: only a strictly longer, fully valid
    /// candidate displaces the local chain, and the swap is a single
    /// assignment. Readers behind the owning lock never observe a
    /// partially updated chain, and the chain never shrinks.
    pub fn replace_chain(&mut self, candidate: Vec<Block>) -> bool {
        if candidate.len() <= self.chain.len() {
            return false;
        }
        if !Self::valid_chain(&candidate, &self.pow) {
            return false;
        }

        info!(
            "replacing local chain: {} -> {} blocks",
            self.chain.len(),
            candidate.len()
        );
        self.chain = candidate;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::Blockchain;
    use crate::blockchain::{Block, ProofOfWork};
    use crate::transaction::Transaction;

    fn test_ledger() -> Blockchain {
        Blockchain::new(ProofOfWork::new(1))
    }

    /// Mine `count` empty blocks the way the mine operation does.
    fn grow(ledger: &mut Blockchain, count: usize) {
        for _ in 0..count {
            let proof = ledger.pow().generate(ledger.last_block().proof);
            ledger.new_block(proof, None);
        }
    }

    #[test]
    fn starts_with_only_the_genesis_block() {
        let ledger = test_ledger();
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.last_block(), &Block::genesis());
        assert!(ledger.is_valid());
    }

    #[test]
    fn new_transaction_reports_the_next_block_index() {
        let mut ledger = test_ledger();
        let index = ledger
            .new_transaction(Transaction::new("a".into(), "b".into(), 5.0))
            .unwrap();
        assert_eq!(index, 2);

        grow(&mut ledger, 1);
        let index = ledger
            .new_transaction(Transaction::new("b".into(), "c".into(), 3.0))
            .unwrap();
        assert_eq!(index, 3);
    }

    #[test]
    fn invalid_transactions_never_reach_the_pool() {
        let mut ledger = test_ledger();
        assert!(
            ledger
                .new_transaction(Transaction::new("".into(), "b".into(), 1.0))
                .is_err()
        );
        assert!(ledger.pending_transactions().is_empty());
    }

    #[test]
    fn mining_seals_pending_transactions_in_order() {
        let mut ledger = test_ledger();
        ledger
            .new_transaction(Transaction::new("A".into(), "B".into(), 5.0))
            .unwrap();
        ledger
            .new_transaction(Transaction::new("B".into(), "C".into(), 3.0))
            .unwrap();

        // Same sequence as the mine operation: solve the puzzle, credit
        // the reward, seal the block.
        let proof = ledger.pow().generate(ledger.last_block().proof);
        ledger
            .new_transaction(Transaction::new("0".into(), "node".into(), 1.0))
            .unwrap();
        let block = ledger.new_block(proof, None);

        assert_eq!(ledger.len(), 2);
        assert_eq!(block.index, 2);
        let parties: Vec<(&str, &str)> = block
            .transactions
            .iter()
            .map(|t| (t.sender.as_str(), t.recipient.as_str()))
            .collect();
        assert_eq!(parties, vec![("A", "B"), ("B", "C"), ("0", "node")]);
        assert!(ledger.pending_transactions().is_empty());
    }

    #[test]
    fn mined_chains_validate() {
        let mut ledger = test_ledger();
        grow(&mut ledger, 4);
        assert_eq!(ledger.len(), 5);
        assert!(ledger.is_valid());
        assert!(Blockchain::valid_chain(ledger.blocks(), &ledger.pow()));
    }

    #[test]
    fn empty_candidate_is_invalid() {
        assert!(!Blockchain::valid_chain(&[], &ProofOfWork::new(1)));
    }

    #[test]
    fn tampered_previous_hash_breaks_validation() {
        let mut ledger = test_ledger();
        grow(&mut ledger, 3);

        let mut chain = ledger.blocks().to_vec();
        chain[2].previous_hash = "forged".to_string();
        assert!(!Blockchain::valid_chain(&chain, &ledger.pow()));
    }

    #[test]
    fn tampered_proof_breaks_validation() {
        let mut ledger = test_ledger();
        grow(&mut ledger, 3);

        // With difficulty 1 and genesis proof 1, the mined proofs are the
        // fixed sequence 25, 11, 10. Proof 12 fails the predicate against
        // 11, so tampering the tip this way must be detected.
        let mut chain = ledger.blocks().to_vec();
        let last = chain.len() - 1;
        assert_eq!(chain[last].proof, 10);
        chain[last].proof = 12;
        assert!(!Blockchain::valid_chain(&chain, &ledger.pow()));
    }

    #[test]
    fn replace_chain_requires_strictly_longer_valid_candidate() {
        let mut local = test_ledger();
        grow(&mut local, 4); // length 5

        // Shorter candidate: untouched.
        let mut shorter = test_ledger();
        grow(&mut shorter, 2);
        assert!(!local.replace_chain(shorter.blocks().to_vec()));
        assert_eq!(local.len(), 5);

        // Equal length: untouched.
        let mut equal = test_ledger();
        grow(&mut equal, 4);
        assert!(!local.replace_chain(equal.blocks().to_vec()));
        assert_eq!(local.len(), 5);

        // Longer but tampered: untouched.
        let mut forged = test_ledger();
        grow(&mut forged, 5);
        let mut forged_chain = forged.blocks().to_vec();
        forged_chain[3].previous_hash = "forged".to_string();
        assert!(!local.replace_chain(forged_chain));
        assert_eq!(local.len(), 5);

        // Longer and valid: replaced wholesale.
        let mut longer = test_ledger();
        grow(&mut longer, 6);
        assert!(local.replace_chain(longer.blocks().to_vec()));
        assert_eq!(local.len(), 7);
        assert!(local.is_valid());
    }
}
