//! Recipe Template Model
//!
//! Templates are the store-agnostic recipe design; deployment to a store
//! produces a [`Recipe`](super::recipe::Recipe) that should mirror its
//! template's ingredient list.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Store-agnostic reusable recipe definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeTemplate {
    pub id: String,
    pub name: String,
    /// Category key, e.g. "classic", "mini_croffle", "croffle_overload".
    pub category: String,
    #[serde(default = "default_yield")]
    pub yield_quantity: f64,
    pub serving_size: Option<f64>,
    pub suggested_price: Option<Decimal>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default = "default_version")]
    pub version: i32,
}

/// Template-level ingredient row. The name is free text; mapping to a
/// concrete inventory item only happens at deployment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateIngredient {
    pub id: String,
    pub template_id: String,
    pub ingredient_name: String,
    pub quantity: f64,
    pub unit: String,
    pub cost_per_unit: Option<Decimal>,
}

fn default_true() -> bool {
    true
}

fn default_yield() -> f64 {
    1.0
}

fn default_version() -> i32 {
    1
}
