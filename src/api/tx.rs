use actix_web::{HttpResponse, Responder, get, post, web};
use log::{info, warn};

use super::internal_error;
use super::models::{AppState, NewTxRequest, NewTxResponse, PendingResponse};

/// Queue a transaction for the next block.
#[post("/transactions/new/")]
pub async fn post_transaction(
    state: web::Data<AppState>,
    body: web::Json<NewTxRequest>,
) -> impl Responder {
    let sender = body.sender.trim();
    let recipient = body.recipient.trim();
    if sender.is_empty() || recipient.is_empty() {
        warn!("POST /transactions/new/ - rejected: empty sender or recipient");
        return HttpResponse::BadRequest().body("sender and recipient required");
    }

    match state.ledger.new_transaction(sender, recipient, body.amount) {
        Ok(index) => {
            info!(
                "POST /transactions/new/ - {} -> {} ({}) queued for block #{}",
                sender, recipient, body.amount, index
            );
            HttpResponse::Created().json(NewTxResponse { index })
        }
        Err(e) => internal_error("POST /transactions/new/", e),
    }
}

/// List transactions waiting for the next block.
#[get("/transactions/pending/")]
pub async fn get_pending(state: web::Data<AppState>) -> impl Responder {
    let transactions = state.ledger.pending();
    HttpResponse::Ok().json(PendingResponse {
        size: transactions.len(),
        transactions,
    })
}
