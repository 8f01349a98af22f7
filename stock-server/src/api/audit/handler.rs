//! Audit handlers

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use shared::ApiResponse;

use crate::audit::{LinkageReport, RepairResult};
use crate::core::ServerState;
use crate::utils::AppResult;

#[derive(Debug, Deserialize)]
pub struct AuditQuery {
    pub store_id: Option<String>,
}

/// GET /api/audit/linkages?store_id= - scan linkages, one store or all
pub async fn audit_linkages(
    State(state): State<ServerState>,
    Query(query): Query<AuditQuery>,
) -> AppResult<Json<ApiResponse<LinkageReport>>> {
    let report = state.audit.audit_linkages(query.store_id.as_deref()).await?;
    Ok(Json(ApiResponse::ok(report)))
}

/// POST /api/audit/repairs?store_id= - apply perfect-match auto-repairs
pub async fn repair_linkages(
    State(state): State<ServerState>,
    Query(query): Query<AuditQuery>,
) -> AppResult<Json<ApiResponse<RepairResult>>> {
    let result = state
        .audit
        .repair_linkages(query.store_id.as_deref())
        .await?;
    Ok(Json(ApiResponse::ok(result)))
}
