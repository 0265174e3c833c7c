use actix_web::{web, HttpResponse, Responder};
use serde_json::json;

use super::http_server::AppState;

/// Liveness probe with per-kind record counts
pub async fn get_health(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "running",
        "version": env!("CARGO_PKG_VERSION"),
        "records": state.store.counts()
    }))
}
