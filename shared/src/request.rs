//! POS-facing request DTOs

use serde::{Deserialize, Serialize};
use validator::Validate;

/// A completed (or proposed) sale handed over by the checkout flow.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SaleInput {
    #[validate(length(min = 1, message = "transaction_id is required"))]
    pub transaction_id: String,
    #[validate(length(min = 1, message = "store_id is required"))]
    pub store_id: String,
    #[validate(length(min = 1, message = "at least one line item is required"), nested)]
    pub items: Vec<SaleLineInput>,
}

/// One proposed line item.
///
/// `product_id` is optional; composite display names resolve by name.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SaleLineInput {
    pub product_id: Option<String>,
    #[validate(length(min = 1, message = "product name is required"))]
    pub name: String,
    #[validate(range(min = 1, message = "quantity must be at least 1"))]
    pub quantity: u32,
    #[serde(default)]
    pub unit_price: f64,
}
