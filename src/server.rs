// src/server.rs
use crate::client::{AlexaLocationClient, CryptoCompareClient};
use crate::config::SkillConfig;
use crate::error::SkillError;
use crate::handler::SkillHandler;
use crate::reference::ReferenceData;
use crate::types::SkillRequest;
use actix_web::{web, HttpResponse, Result};
use chrono::{DateTime, Utc};
use log::error;
use reqwest::Client;
use std::sync::Arc;
use uuid::Uuid;

pub struct AppState {
    pub handler: SkillHandler,
    pub session_id: Uuid,
    pub start_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(handler: SkillHandler) -> Self {
        Self {
            handler,
            session_id: Uuid::new_v4(),
            start_time: Utc::now(),
        }
    }

    /// State wired to the live quote and location services.
    pub fn from_config(config: SkillConfig) -> Result<Self, SkillError> {
        let reference = ReferenceData::for_config(&config)?;
        let http_client = Client::builder().timeout(config.timeout).build()?;
        let quotes = Arc::new(CryptoCompareClient::from_config(&config, http_client.clone()));
        let locations = Arc::new(AlexaLocationClient::new(http_client));
        let handler = SkillHandler::new(config, reference, quotes, locations)?;
        Ok(Self::new(handler))
    }
}

pub async fn handle_skill_request(
    payload: web::Json<SkillRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let request = payload.into_inner();

    match state.handler.handle(&request).await {
        Ok(response) => Ok(HttpResponse::Ok().json(response)),
        Err(e) => {
            error!("Failed to handle {}: {}", request.request_type(), e);
            Ok(HttpResponse::InternalServerError().json(serde_json::json!({
                "error": e.to_string(),
            })))
        }
    }
}

pub async fn health_check(state: web::Data<AppState>) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "crypto-price-skill",
        "session_id": state.session_id,
        "uptime_seconds": (Utc::now() - state.start_time).num_seconds(),
        "version": env!("CARGO_PKG_VERSION"),
    })))
}

pub async fn cors_handler() -> HttpResponse {
    HttpResponse::Ok()
        .insert_header(("Access-Control-Allow-Origin", "*"))
        .insert_header(("Access-Control-Allow-Methods", "POST, GET, OPTIONS"))
        .insert_header(("Access-Control-Allow-Headers", "Content-Type, Authorization"))
        .finish()
}

/// Routes served by the skill endpoint.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/skill", web::post().to(handle_skill_request))
        .route("/health", web::get().to(health_check))
        .default_service(web::to(cors_handler));
}
