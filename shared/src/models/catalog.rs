//! Product Catalog Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The sellable unit shown in the POS, scoped to one store.
///
/// Every available entry should resolve to a recipe (preferred) or a
/// name-matched template; entries resolving to neither are not sellable from
/// an inventory-accuracy standpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCatalogEntry {
    pub id: String,
    pub store_id: String,
    pub product_name: String,
    pub price: Decimal,
    #[serde(default = "default_true")]
    pub is_available: bool,
    pub recipe_id: Option<String>,
}

/// Declared Mix & Match metadata for one product category.
///
/// Composite-ness and the optional-ingredient vocabulary are explicit data,
/// never inferred from product-name substrings. Name parsing is confined to
/// choice extraction, which is inherent to the display-name contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryVocabulary {
    pub category: String,
    #[serde(default)]
    pub is_composite: bool,
    /// Optional add-on ingredient names selectable at sale time.
    #[serde(default)]
    pub choices: Vec<String>,
    /// Fraction of the ingredient serving deducted per selected choice.
    /// A Mix & Match slot splits one serving across the chosen toppings.
    #[serde(default = "default_choice_portion")]
    pub choice_portion: f64,
}

fn default_true() -> bool {
    true
}

fn default_choice_portion() -> f64 {
    0.5
}
