//! API Response types
//!
//! The unified response envelope plus the POS-facing result shapes of the
//! validation gate and the deduction engine.

use serde::{Deserialize, Serialize};

use crate::models::DeductionStatus;

/// Standard API response code
pub const API_CODE_SUCCESS: &str = "E0000";

/// Unified API response structure
///
/// All API responses follow this format:
/// ```json
/// {
///     "code": "E0000",
///     "message": "Success",
///     "data": { ... }
/// }
/// ```
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Response code (E0000 = success, others = error codes)
    pub code: String,
    /// Human-readable message
    pub message: String,
    /// Response data (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Create a successful response
    pub fn ok(data: T) -> Self {
        Self {
            code: API_CODE_SUCCESS.to_string(),
            message: "Success".to_string(),
            data: Some(data),
        }
    }

    /// Create an error response
    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            data: None,
        }
    }
}

// =============================================================================
// Pre-transaction validation
// =============================================================================

/// A line item the validator refuses to let through checkout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockedProduct {
    pub product_id: Option<String>,
    pub product_name: String,
    pub issues: Vec<String>,
}

/// Result of the pre-transaction gate. `can_proceed` is false only on hard
/// resolution failures; everything else is a non-blocking warning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub can_proceed: bool,
    pub blocked_products: Vec<BlockedProduct>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn passed() -> Self {
        Self {
            can_proceed: true,
            blocked_products: Vec::new(),
            warnings: Vec::new(),
        }
    }
}

// =============================================================================
// Deduction results
// =============================================================================

/// One applied stock write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeductedItem {
    pub inventory_stock_id: String,
    pub item_name: String,
    pub quantity_deducted: f64,
    pub new_stock: f64,
}

/// Outcome of deducting one transaction line item.
///
/// `success` is true only if every applicable ingredient deducted cleanly;
/// skipped ingredients (unmapped, already deducted) are listed for the audit
/// trail rather than treated as errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineDeductionResult {
    pub line_name: String,
    pub success: bool,
    pub deducted: Vec<DeductedItem>,
    pub skipped: Vec<String>,
    pub errors: Vec<String>,
}

/// Aggregate outcome of orchestrating one transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionDeductionResult {
    pub transaction_id: String,
    pub status: DeductionStatus,
    pub lines: Vec<LineDeductionResult>,
    pub deducted_count: usize,
    pub skipped_count: usize,
    pub errors: Vec<String>,
    pub elapsed_ms: u64,
}
