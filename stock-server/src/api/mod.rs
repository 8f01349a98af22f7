//! HTTP API
//!
//! Operator tooling and POS-facing routes. Every response uses the
//! [`shared::ApiResponse`] envelope; errors map through
//! [`AppError`](crate::utils::AppError).

pub mod audit;
pub mod deductions;
pub mod health;
pub mod reconcile;
pub mod validation;

use axum::Router;

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(validation::router())
        .merge(deductions::router())
        .merge(reconcile::router())
        .merge(audit::router())
}
