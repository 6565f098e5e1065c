use actix_web::{HttpResponse, Responder, get, post, web};
use log::{info, warn};

use super::models::{AppState, NewTransactionRequest, NewTransactionResponse, PendingResponse};
use crate::transaction::Transaction;

/// Submit a new transaction for inclusion in the next mined block.
#[post("/transactions/")]
pub async fn post_transaction(
    state: web::Data<AppState>,
    body: web::Json<NewTransactionRequest>,
) -> impl Responder {
    let body = body.into_inner();
    let tx = Transaction::new(body.sender, body.recipient, body.amount);

    let index = {
        let mut ledger = state.ledger.lock().expect("mutex poisoned");
        match ledger.new_transaction(tx) {
            Ok(index) => index,
            Err(err) => {
                warn!("POST /transactions/ - rejected: {err}");
                return HttpResponse::BadRequest().body(err.to_string());
            }
        }
    };

    info!("POST /transactions/ - queued for block {index}");
    HttpResponse::Created().json(NewTransactionResponse {
        message: format!("New transaction added to block: {index}"),
        index,
    })
}

/// List the transactions waiting for the next mined block.
#[get("/transactions/pending/")]
pub async fn get_pending(state: web::Data<AppState>) -> impl Responder {
    let ledger = state.ledger.lock().expect("mutex poisoned");
    let pending = ledger.pending_transactions();
    HttpResponse::Ok().json(PendingResponse {
        size: pending.len(),
        transactions: pending.to_vec(),
    })
}
