use actix_web::{App, HttpServer, web};
use dotenvy::dotenv;
use log::info;

use pow_ledger::api::{self, AppState};
use pow_ledger::blockchain::Ledger;
use pow_ledger::config::Config;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let _ = dotenv();
    env_logger::init();

    let config = Config::from_env().map_err(std::io::Error::other)?;
    let ledger = Ledger::with_difficulty(config.difficulty).map_err(std::io::Error::other)?;

    info!(
        "⛓️ Starting ledger API at http://{}:{} (difficulty {})",
        config.host, config.port, config.difficulty
    );

    let state = web::Data::new(AppState::new(ledger));

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(api::init_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
