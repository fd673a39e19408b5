use actix_web::{get, web, HttpResponse, Responder};
use chrono::Utc;
use serde_json::json;

use crate::state::AppState;

/// Health check endpoint
///
/// Reports whether the store answers, together with the current timestamp.
/// Responds `503 Service Unavailable` when the store cannot be reached.
#[get("/health")]
pub async fn health(state: web::Data<AppState>) -> impl Responder {
    match state.store.ping().await {
        Ok(()) => HttpResponse::Ok().json(json!({
            "status": "ok",
            "store": "ok",
            "timestamp": Utc::now()
        })),
        Err(err) => {
            log::warn!("Health check failed: {}", err);
            HttpResponse::ServiceUnavailable().json(json!({
                "status": "degraded",
                "store": "unreachable",
                "timestamp": Utc::now()
            }))
        }
    }
}
