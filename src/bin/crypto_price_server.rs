// src/bin/crypto_price_server.rs
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use log::info;
use std::env;

use crypto_price_skill::config::SkillConfig;
use crypto_price_skill::server::{configure, AppState};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = SkillConfig::from_env()?;
    let state = web::Data::new(AppState::from_config(config)?);
    let port = env::var("PORT").unwrap_or_else(|_| "8080".to_string());
    let bind_address = format!("0.0.0.0:{}", port);

    info!("Crypto price skill listening on http://{}", bind_address);
    info!("  POST /skill   - voice skill requests");
    info!("  GET  /health  - health check");

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Logger::default())
            .configure(configure)
    })
    .bind(&bind_address)?
    .run()
    .await?;

    Ok(())
}
