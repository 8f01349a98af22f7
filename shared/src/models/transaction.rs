//! Sale Transaction Model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Deduction lifecycle of a completed sale.
///
/// `PartiallyFailed` and `Failed` transactions are candidates for the
/// reconcile service; the sale itself is immutable either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeductionStatus {
    Pending,
    Processing,
    Completed,
    PartiallyFailed,
    Failed,
}

impl DeductionStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            DeductionStatus::Completed | DeductionStatus::PartiallyFailed | DeductionStatus::Failed
        )
    }
}

/// A completed POS sale. Immutable once created; the source of truth the
/// deduction engine consumes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleTransaction {
    pub id: String,
    pub store_id: String,
    pub total: Decimal,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub items: Vec<TransactionItem>,
    pub deduction_status: DeductionStatus,
}

/// One line item of a sale.
///
/// `product_id` is optional: composite Mix & Match lines are keyed by display
/// name and may not map to a single catalog id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionItem {
    pub product_id: Option<String>,
    /// POS display name, e.g. "Mini Croffle with Choco Flakes and Marshmallow".
    pub name: String,
    pub quantity: u32,
    pub unit_price: Decimal,
}
