//! Inventory Movement Model
//!
//! Append-only audit trail. Rows are never updated or deleted; a rollback
//! appends a compensating row instead of touching the original. Idempotence
//! checks key off the (inventory item, reference) pair.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Cause of a stock quantity change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementType {
    /// Sale deduction.
    Deduction,
    /// Compensating restoration after a failed deduction.
    Rollback,
    /// Operator-triggered re-run of a missed transaction.
    Correction,
}

/// One stock quantity change and its cause.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryMovement {
    pub id: Option<String>,
    pub inventory_stock_id: String,
    pub store_id: String,
    pub movement_type: MovementType,
    /// Signed delta applied to stock (negative for deductions).
    pub quantity_delta: f64,
    pub previous_quantity: f64,
    pub new_quantity: f64,
    /// Id of the causing transaction.
    pub reference_id: String,
    pub note: Option<String>,
    pub actor: String,
    pub created_at: DateTime<Utc>,
}

impl InventoryMovement {
    /// True if this row compensates an earlier deduction of the same
    /// reference (rollback restores add stock back).
    pub fn is_compensation(&self) -> bool {
        matches!(self.movement_type, MovementType::Rollback) && self.quantity_delta > 0.0
    }
}
