//! Inventory Stock Model

use serde::{Deserialize, Serialize};

/// A raw-inventory stock keeping unit, scoped to one store.
///
/// `stock_quantity` is never persisted negative; the deduction engine clamps
/// at zero and records the shortfall instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: String,
    pub store_id: String,
    /// Free-text item name. Store-local uniqueness is assumed by matching,
    /// not enforced by the backend.
    pub item: String,
    pub unit: String,
    pub stock_quantity: f64,
    #[serde(default)]
    pub minimum_threshold: f64,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl InventoryItem {
    /// At or below the restock threshold.
    pub fn is_low(&self) -> bool {
        self.minimum_threshold > 0.0 && self.stock_quantity <= self.minimum_threshold
    }
}

fn default_true() -> bool {
    true
}
