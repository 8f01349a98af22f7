//! Reconcile handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use shared::ApiResponse;
use shared::models::SaleTransaction;

use crate::core::ServerState;
use crate::reconcile::{ReconciliationResult, RollbackResult};
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct RollbackRequest {
    pub transaction_id: String,
}

/// POST /api/reconcile/rollback - reverse a transaction's applied deductions
pub async fn rollback(
    State(state): State<ServerState>,
    Json(payload): Json<RollbackRequest>,
) -> AppResult<Json<ApiResponse<RollbackResult>>> {
    if payload.transaction_id.is_empty() {
        return Err(AppError::Validation("transaction_id is required".into()));
    }
    let result = state.reconcile.rollback(&payload.transaction_id).await?;
    Ok(Json(ApiResponse::ok(result)))
}

/// POST /api/reconcile/corrections/:transaction_id - re-run a missed
/// transaction (idempotent)
pub async fn correct_transaction(
    State(state): State<ServerState>,
    Path(transaction_id): Path<String>,
) -> AppResult<Json<ApiResponse<ReconciliationResult>>> {
    let result = state.reconcile.correct_transaction(&transaction_id).await?;
    Ok(Json(ApiResponse::ok(result)))
}

/// GET /api/reconcile/candidates - transactions in failed terminal states
pub async fn list_candidates(
    State(state): State<ServerState>,
) -> AppResult<Json<ApiResponse<Vec<SaleTransaction>>>> {
    let candidates = state.reconcile.candidates().await?;
    Ok(Json(ApiResponse::ok(candidates)))
}
