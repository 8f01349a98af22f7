//! Pre-transaction validation handlers

use axum::{Json, extract::State};
use shared::response::ValidationResult;
use shared::{ApiResponse, SaleInput};
use validator::Validate;

use crate::core::ServerState;
use crate::utils::AppResult;

/// POST /api/validation - gate a proposed sale before checkout
pub async fn validate_sale(
    State(state): State<ServerState>,
    Json(payload): Json<SaleInput>,
) -> AppResult<Json<ApiResponse<ValidationResult>>> {
    payload.validate()?;
    let result = state.validator.validate(&payload).await;
    Ok(Json(ApiResponse::ok(result)))
}
