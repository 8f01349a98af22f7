//! Deduction handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::InventoryMovement;
use shared::response::TransactionDeductionResult;
use shared::{ApiResponse, SaleInput};
use validator::Validate;

use crate::core::ServerState;
use crate::utils::AppResult;

/// POST /api/deductions - run inventory deduction for a completed sale
pub async fn deduct_sale(
    State(state): State<ServerState>,
    Json(payload): Json<SaleInput>,
) -> AppResult<Json<ApiResponse<TransactionDeductionResult>>> {
    payload.validate()?;
    let result = state.orchestrator.process_sale(&payload).await;
    Ok(Json(ApiResponse::ok(result)))
}

/// GET /api/deductions/:transaction_id/movements - the movement trail of one
/// transaction
pub async fn list_movements(
    State(state): State<ServerState>,
    Path(transaction_id): Path<String>,
) -> AppResult<Json<ApiResponse<Vec<InventoryMovement>>>> {
    let movements = state.store.movements_for_reference(&transaction_id).await?;
    Ok(Json(ApiResponse::ok(movements)))
}

/// GET /api/inventory/:inventory_stock_id/movements - the movement trail of
/// one inventory item
pub async fn list_item_movements(
    State(state): State<ServerState>,
    Path(inventory_stock_id): Path<String>,
) -> AppResult<Json<ApiResponse<Vec<InventoryMovement>>>> {
    let movements = state.store.movements_for_item(&inventory_stock_id).await?;
    Ok(Json(ApiResponse::ok(movements)))
}
