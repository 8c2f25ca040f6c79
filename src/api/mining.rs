use actix_web::{HttpResponse, Responder, post, web};
use log::info;
use std::time::Instant;

use super::internal_error;
use super::models::{AppState, MineResponse};

/// Seal the pending transactions into a new block.
///
/// The proof search is CPU bound, so it runs on the blocking pool rather
/// than on the worker thread.
#[post("/mine/")]
pub async fn mine_block(state: web::Data<AppState>) -> impl Responder {
    let t0 = Instant::now();
    let mined = web::block(move || state.ledger.mine_block()).await;

    let block = match mined {
        Ok(Ok(block)) => block,
        Ok(Err(e)) => return internal_error("POST /mine/", e),
        Err(e) => {
            return HttpResponse::InternalServerError().body(format!("mining task failed: {e}"));
        }
    };
    let hash = match block.hash() {
        Ok(h) => h,
        Err(e) => return internal_error("POST /mine/", e),
    };

    info!(
        "MINER - sealed block #{} (hash={}, proof={}, {} ms)",
        block.index,
        hash,
        block.proof,
        t0.elapsed().as_millis()
    );
    HttpResponse::Ok().json(MineResponse {
        index: block.index,
        hash,
        proof: block.proof,
        previous_hash: block.previous_hash,
        timestamp: block.timestamp,
        transactions: block.transactions,
    })
}
