//! Deduction API module

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/deductions", post(handler::deduct_sale))
        .route(
            "/api/deductions/{transaction_id}/movements",
            get(handler::list_movements),
        )
        .route(
            "/api/inventory/{inventory_stock_id}/movements",
            get(handler::list_item_movements),
        )
}
