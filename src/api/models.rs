use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::blockchain::{Block, Blockchain, ConsensusResolver, ProofOfWork};
use crate::network::{HttpChainFetcher, PEER_FETCH_TIMEOUT_SECS, PeerRegistry};
use crate::transaction::Transaction;

/// Shared application state: the in-memory ledger, the peer registry,
/// the consensus resolver and this node's mining identity.
pub struct AppState {
    pub ledger: Mutex<Blockchain>,
    pub peers: Mutex<PeerRegistry>,
    pub resolver: ConsensusResolver,
    pub node_id: String,
}

impl AppState {
    pub fn new(node_id: String) -> Self {
        let pow = ProofOfWork::default();
        let fetcher = HttpChainFetcher::new(Duration::from_secs(PEER_FETCH_TIMEOUT_SECS))
            .expect("build peer HTTP client");
        Self {
            ledger: Mutex::new(Blockchain::new(pow)),
            peers: Mutex::new(PeerRegistry::new()),
            resolver: ConsensusResolver::new(Arc::new(fetcher), pow),
            node_id,
        }
    }
}

/* ---------- Mining API Models ---------- */

#[derive(Serialize)]
pub struct MineResponse {
    pub message: String,
    pub index: u64,
    pub transactions: Vec<Transaction>,
    pub proof: u64,
    pub previous_hash: String,
}

/* ---------- Transaction API Models ---------- */

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewTransactionRequest {
    pub sender: String,
    pub recipient: String,
    pub amount: f64,
}

#[derive(Serialize)]
pub struct NewTransactionResponse {
    pub message: String,
    pub index: u64,
}

#[derive(Serialize)]
pub struct PendingResponse {
    pub size: usize,
    pub transactions: Vec<Transaction>,
}

/* ---------- Chain API Models ---------- */

#[derive(Serialize)]
pub struct ChainResponse<'a> {
    pub length: usize,
    pub chain: &'a [Block],
}

#[derive(Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub length: usize,
    pub difficulty: u32,
}

/* ---------- Node API Models ---------- */

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterNodesRequest {
    pub nodes: Vec<String>,
}

#[derive(Serialize)]
pub struct RegisterNodesResponse {
    pub message: String,
    pub total_nodes: Vec<String>,
    pub count: usize,
}

#[derive(Serialize)]
pub struct ResolveResponse {
    pub message: String,
    pub replaced: bool,
    pub chain: Vec<Block>,
}
