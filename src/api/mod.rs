mod chain;
mod health;
mod mining;
pub mod models;
mod tx;

use actix_web::HttpResponse;
use actix_web::web::{self, ServiceConfig};
use log::error;

use crate::error::LedgerError;
pub use models::AppState;

pub fn init_routes(cfg: &mut ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .service(health::health_check)
            .service(chain::get_chain)
            .service(chain::validate_chain)
            .service(chain::get_block_hash)
            .service(tx::post_transaction)
            .service(tx::get_pending)
            .service(mining::mine_block),
    );
}

/// Log a core failure and turn it into a 500.
fn internal_error(context: &str, err: LedgerError) -> HttpResponse {
    error!("{context}: {err}");
    HttpResponse::InternalServerError().body(err.to_string())
}
