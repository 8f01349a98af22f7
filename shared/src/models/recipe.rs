//! Recipe Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A store-specific deployment of a recipe template.
///
/// `template_id` is nullable in the backend; a null here is a broken link
/// and a repair target, not a valid state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    pub id: String,
    pub store_id: String,
    pub template_id: Option<String>,
    pub name: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub suggested_price: Option<Decimal>,
}

/// One ingredient row of a deployed recipe.
///
/// `inventory_stock_id` is the ingredient-to-inventory mapping. When it is
/// `None` the ingredient cannot be deducted; the engine flags it and moves
/// on rather than failing the whole resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeIngredient {
    pub id: String,
    pub recipe_id: String,
    pub ingredient_name: String,
    pub quantity: f64,
    pub unit: String,
    pub inventory_stock_id: Option<String>,
}

fn default_true() -> bool {
    true
}
