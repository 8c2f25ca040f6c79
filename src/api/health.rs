use actix_web::{HttpResponse, Responder, get, web};
use serde_json::json;

use super::models::AppState;

/// Liveness plus the current chain height.
#[get("/health/")]
pub async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let (height, difficulty) = state.ledger.with(|l| (l.height(), l.difficulty()));
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "height": height,
        "difficulty": difficulty,
    }))
}
