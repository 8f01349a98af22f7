//! Health API module

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;
use shared::ApiResponse;

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/health", get(health))
}

#[derive(Debug, Serialize)]
struct HealthInfo {
    status: &'static str,
    version: &'static str,
    environment: String,
    store_ok: bool,
}

async fn health(State(state): State<ServerState>) -> Json<ApiResponse<HealthInfo>> {
    let store_ok = state.store_healthy().await;
    Json(ApiResponse::ok(HealthInfo {
        status: if store_ok { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        environment: state.config.environment.clone(),
        store_ok,
    }))
}
