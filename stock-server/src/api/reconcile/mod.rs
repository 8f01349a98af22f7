//! Reconcile API module

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/reconcile/rollback", post(handler::rollback))
        .route(
            "/api/reconcile/corrections/{transaction_id}",
            post(handler::correct_transaction),
        )
        .route("/api/reconcile/candidates", get(handler::list_candidates))
}
