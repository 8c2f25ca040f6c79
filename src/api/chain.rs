use actix_web::{HttpResponse, Responder, get, web};
use log::debug;

use super::internal_error;
use super::models::{AppState, BlockHashResponse, ChainResponse, ValidateResponse};

/// Get the full chain.
#[get("/chain/")]
pub async fn get_chain(state: web::Data<AppState>) -> impl Responder {
    state.ledger.with(|ledger| {
        HttpResponse::Ok().json(ChainResponse {
            length: ledger.height(),
            difficulty: ledger.difficulty(),
            chain: ledger.chain(),
        })
    })
}

/// Validate the whole chain.
#[get("/validate/")]
pub async fn validate_chain(state: web::Data<AppState>) -> impl Responder {
    let resp = state.ledger.with(|ledger| ValidateResponse {
        valid: ledger.is_valid_chain(),
        length: ledger.height(),
        difficulty: ledger.difficulty(),
    });
    debug!("GET /validate/ - valid={} length={}", resp.valid, resp.length);
    HttpResponse::Ok().json(resp)
}

/// Hash of the block at a 1-based chain position.
#[get("/blocks/{index}/hash/")]
pub async fn get_block_hash(
    state: web::Data<AppState>,
    path: web::Path<(u64,)>,
) -> impl Responder {
    let index = path.into_inner().0;
    let Some(block) = state.ledger.block(index) else {
        return HttpResponse::NotFound().body(format!("no block at index {index}"));
    };
    match block.hash() {
        Ok(hash) => HttpResponse::Ok().json(BlockHashResponse { index, hash }),
        Err(e) => internal_error("GET /blocks/{index}/hash/", e),
    }
}
