//! Reconcile result types

use serde::{Deserialize, Serialize};
use shared::response::TransactionDeductionResult;

/// One restored stock write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestoredItem {
    pub inventory_stock_id: String,
    pub item_name: String,
    pub quantity_restored: f64,
    pub new_stock: f64,
}

/// Outcome of rolling back one transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RollbackResult {
    pub transaction_id: String,
    pub success: bool,
    pub restored: Vec<RestoredItem>,
    /// Movements already compensated earlier (idempotent re-invocation).
    pub skipped: Vec<String>,
    pub issues: Vec<String>,
}

/// Outcome of re-running a missed transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconciliationResult {
    pub transaction_id: String,
    pub success: bool,
    pub deduction: TransactionDeductionResult,
    pub issues: Vec<String>,
}
