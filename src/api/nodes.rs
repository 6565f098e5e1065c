use actix_web::{HttpResponse, Responder, post, web};
use log::{info, warn};

use super::models::{AppState, RegisterNodesRequest, RegisterNodesResponse, ResolveResponse};

/// Register neighbouring nodes so consensus resolution can reach them.
#[post("/nodes/")]
pub async fn register_nodes(
    state: web::Data<AppState>,
    body: web::Json<RegisterNodesRequest>,
) -> impl Responder {
    if body.nodes.is_empty() {
        warn!("POST /nodes/ - rejected: empty node list");
        return HttpResponse::BadRequest().body("at least one node address is required");
    }

    let mut peers = state.peers.lock().expect("mutex poisoned");
    for address in &body.nodes {
        match peers.register(address) {
            Ok(authority) => info!("registered peer {authority}"),
            Err(err) => {
                warn!("POST /nodes/ - rejected {address}: {err}");
                return HttpResponse::BadRequest().body(err.to_string());
            }
        }
    }

    HttpResponse::Created().json(RegisterNodesResponse {
        message: "Added new nodes to the network".to_string(),
        count: peers.len(),
        total_nodes: peers.list(),
    })
}

/// Resolve conflicts against every registered peer with the
/// longest-valid-chain rule.
#[post("/nodes/resolve/")]
pub async fn resolve(state: web::Data<AppState>) -> impl Responder {
    let peers = {
        let registry = state.peers.lock().expect("mutex poisoned");
        registry.list()
    };

    let replaced = state.resolver.resolve(&state.ledger, &peers).await;

    let (message, chain) = {
        let ledger = state.ledger.lock().expect("mutex poisoned");
        let message = if replaced {
            "Chain has been replaced"
        } else {
            "This chain is the authoritative"
        };
        (message.to_string(), ledger.blocks().to_vec())
    };

    HttpResponse::Ok().json(ResolveResponse {
        message,
        replaced,
        chain,
    })
}
