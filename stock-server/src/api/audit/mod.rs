//! Audit API module

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/audit/linkages", get(handler::audit_linkages))
        .route("/api/audit/repairs", post(handler::repair_linkages))
}
