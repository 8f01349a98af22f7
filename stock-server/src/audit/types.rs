//! Audit report types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How a deployed recipe compares against its template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsistencyClass {
    Consistent,
    QuantityMismatch,
    UnitMismatch,
    /// Template ingredients missing from the deployed recipe.
    MissingDeployment,
}

/// Consistency verdict for one deployed recipe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeConsistency {
    pub store_id: String,
    pub recipe_id: String,
    pub recipe_name: String,
    pub template_id: Option<String>,
    pub class: ConsistencyClass,
    pub details: Vec<String>,
}

/// A product that cannot currently be deducted end-to-end.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnmappedProduct {
    pub store_id: String,
    pub product_id: Option<String>,
    pub product_name: String,
    pub issues: Vec<String>,
}

/// Catalog entries sharing one normalized name within a store. Reported,
/// never auto-merged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateGroup {
    pub store_id: String,
    pub normalized_name: String,
    pub entry_ids: Vec<String>,
}

/// Inventory at or below its restock threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LowStockItem {
    pub store_id: String,
    pub inventory_stock_id: String,
    pub item: String,
    pub stock_quantity: f64,
    pub minimum_threshold: f64,
}

/// Full linkage audit report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkageReport {
    pub generated_at: DateTime<Utc>,
    pub stores_scanned: usize,
    pub consistency: Vec<RecipeConsistency>,
    pub unmapped: Vec<UnmappedProduct>,
    pub duplicates: Vec<DuplicateGroup>,
    pub low_stock: Vec<LowStockItem>,
    /// Findings outside the classes above: broken template links, inactive
    /// templates, cross-store references, scan errors.
    pub issues: Vec<String>,
    pub ok: bool,
}

/// What a repair changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepairKind {
    /// Catalog entry linked to the uniquely name-matched recipe.
    LinkedRecipe,
    /// Recipe ingredient mapped to the uniquely matched inventory item.
    MappedIngredient,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepairAction {
    pub kind: RepairKind,
    pub store_id: String,
    pub target: String,
    pub detail: String,
}

/// Outcome of an auto-repair pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepairResult {
    pub success: bool,
    pub linked_products: usize,
    pub mapped_ingredients: usize,
    pub actions: Vec<RepairAction>,
    /// Products left untouched (ambiguous or no candidate) for manual
    /// review.
    pub skipped: Vec<String>,
    pub issues: Vec<String>,
}
