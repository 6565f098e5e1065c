use actix_web::{HttpResponse, Responder, get, web};
use log::{debug, info};

use super::models::{AppState, MineResponse};
use crate::blockchain::{MINING_REWARD, REWARD_SENDER};
use crate::transaction::Transaction;

/// Mine a new block: solve the proof-of-work puzzle for the current
/// chain head, credit the mining reward to this node, then seal the
/// pending transactions. The proof search runs on the blocking worker
/// pool so the other endpoints stay responsive while it grinds.
#[get("/mine/")]
pub async fn mine(state: web::Data<AppState>) -> impl Responder {
    let (pow, last_proof) = {
        let ledger = state.ledger.lock().expect("mutex poisoned");
        (ledger.pow(), ledger.last_block().proof)
    };

    debug!("MINER - searching proof against last_proof={last_proof}");
    let proof = match web::block(move || pow.generate(last_proof)).await {
        Ok(proof) => proof,
        Err(_) => return HttpResponse::InternalServerError().body("mining worker failed"),
    };

    let block = {
        let mut ledger = state.ledger.lock().expect("mutex poisoned");

        // A mined block is denoted by a reward sent from "0" to this node.
        let reward = Transaction::new(
            REWARD_SENDER.to_string(),
            state.node_id.clone(),
            MINING_REWARD,
        );
        ledger
            .new_transaction(reward)
            .expect("reward transaction is well-formed");

        let previous_hash = ledger.last_block().hash();
        ledger.new_block(proof, Some(previous_hash))
    };

    info!(
        "MINER - sealed block #{} (proof={}, txs={})",
        block.index,
        block.proof,
        block.transactions.len()
    );

    HttpResponse::Ok().json(MineResponse {
        message: "Mined New Block".to_string(),
        index: block.index,
        transactions: block.transactions,
        proof: block.proof,
        previous_hash: block.previous_hash,
    })
}
