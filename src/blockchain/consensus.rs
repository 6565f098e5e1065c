use std::sync::{Arc, Mutex};

use log::{debug, info, warn};

use super::{Block, Blockchain, ProofOfWork};
use crate::error::{Error, Result};
use crate::network::transport::{ChainFetcher, ChainSnapshot};

/// Longest-valid-chain conflict resolution over the registered peers,
/// the sole consistency mechanism between nodes. Peer I/O goes through
/// the injected `ChainFetcher`.
#[derive(Clone)]
pub struct ConsensusResolver {
    fetcher: Arc<dyn ChainFetcher>,
    pow: ProofOfWork,
}

impl ConsensusResolver {
    pub fn new(fetcher: Arc<dyn ChainFetcher>, pow: ProofOfWork) -> Self {
        Self { fetcher, pow }
    }

    /// Run a full resolution pass against `ledger`. The ledger lock is
    /// held only to read the local length and to apply the final swap,
    /// never across peer fetches. Returns whether the chain was replaced.
    pub async fn resolve(&self, ledger: &Mutex<Blockchain>, peers: &[String]) -> bool {
        let local_length = ledger.lock().expect("mutex poisoned").len();

        match self.find_longer_chain(peers, local_length).await {
            Some(candidate) => {
                // replace_chain re-checks the length under the lock, so a
                // block mined while we were fetching still wins over a
                // now-equal candidate.
                let replaced = ledger
                    .lock()
                    .expect("mutex poisoned")
                    .replace_chain(candidate);
                if replaced {
                    info!("consensus: local chain replaced");
                }
                replaced
            }
            None => {
                info!("consensus: local chain is authoritative");
                false
            }
        }
    }

    /// Fetch every peer's chain and return the longest valid one that is
    /// strictly longer than `local_length`. Unreachable peers, malformed
    /// snapshots and invalid chains are skipped; equal lengths never win,
    /// and among strict improvements the last one iterated wins.
    pub async fn find_longer_chain(
        &self,
        peers: &[String],
        local_length: usize,
    ) -> Option<Vec<Block>> {
        let mut max_length = local_length;
        let mut new_chain: Option<Vec<Block>> = None;

        for peer in peers {
            let snapshot = match self.fetch_usable(peer).await {
                Ok(snapshot) => snapshot,
                Err(err) => {
                    warn!("skipping peer {peer}: {err}");
                    continue;
                }
            };

            debug!(
                "peer {peer} reports {} blocks (current max {max_length})",
                snapshot.length
            );
            if snapshot.length > max_length {
                max_length = snapshot.length;
                new_chain = Some(snapshot.chain);
            }
        }

        new_chain
    }

    async fn fetch_usable(&self, peer: &str) -> Result<ChainSnapshot> {
        let snapshot = self.fetcher.fetch_chain(peer).await?;

        if snapshot.length != snapshot.chain.len() {
            return Err(Error::Transport(format!(
                "peer {peer} reported length {} for {} blocks",
                snapshot.length,
                snapshot.chain.len()
            )));
        }
        if !Blockchain::valid_chain(&snapshot.chain, &self.pow) {
            return Err(Error::ChainIntegrity);
        }

        Ok(snapshot)
    }
}
