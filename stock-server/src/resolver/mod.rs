//! Recipe Resolver
//!
//! Finds the authoritative ingredient list for a sold product: the
//! store-deployed recipe when its linkage is intact, otherwise a recipe
//! template matched by normalized name (with a warning). Resolution never
//! writes.
//!
//! ```text
//! resolve(store, product)
//!     ├─ 1. catalog entry by id (or by normalized name within store)
//!     ├─ 2. recipe path: entry.recipe_id → active recipe → ≥1 ingredients
//!     ├─ 3. template fallback: template named like the product, active, ≥1 rows
//!     └─ 4. typed ResolutionError otherwise
//! ```

use std::sync::Arc;

use shared::models::ProductCatalogEntry;
use shared::normalize_name;
use thiserror::Error;
use tracing::warn;

use crate::store::{Datastore, StoreError};

/// One ingredient the engine may deduct, with its per-unit-sold quantity and
/// the inventory mapping when the recipe path provides one.
#[derive(Debug, Clone)]
pub struct ResolvedIngredient {
    pub ingredient_name: String,
    pub quantity_per_unit: f64,
    pub unit: String,
    pub inventory_stock_id: Option<String>,
}

/// Which path produced the ingredient list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngredientSource {
    Recipe,
    TemplateFallback,
}

/// Successful resolution.
#[derive(Debug, Clone)]
pub struct ResolvedRecipe {
    pub ingredients: Vec<ResolvedIngredient>,
    pub source: IngredientSource,
    /// Product category when known (from the template); drives Mix & Match
    /// vocabulary lookup.
    pub category: Option<String>,
    pub warnings: Vec<String>,
}

/// Typed resolution failures. These never escape as panics or raw store
/// errors; the validator turns them into blocking errors and the engine into
/// line-item errors.
#[derive(Debug, Error)]
pub enum ResolutionError {
    #[error("no catalog entry for '{0}'")]
    NoCatalogEntry(String),

    #[error("recipe for '{0}' is inactive or missing, and no template matches")]
    InactiveRecipe(String),

    #[error("recipe for '{0}' has an empty ingredient list, and no template matches")]
    EmptyIngredients(String),

    #[error("'{0}' has no linked recipe and no template matches by name")]
    NoTemplateMatch(String),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Why the recipe path did not yield ingredients, kept for error precedence
/// when the template fallback also fails.
enum RecipePathMiss {
    NoLink,
    InactiveOrMissing,
    Empty,
}

#[derive(Clone)]
pub struct RecipeResolver {
    store: Arc<dyn Datastore>,
}

impl RecipeResolver {
    pub fn new(store: Arc<dyn Datastore>) -> Self {
        Self { store }
    }

    /// Resolve the ingredient list for a product within a store.
    ///
    /// `product_name` should already be the base name for composite display
    /// names (callers split on `" with "` first).
    pub async fn resolve(
        &self,
        store_id: &str,
        product_id: Option<&str>,
        product_name: &str,
    ) -> Result<ResolvedRecipe, ResolutionError> {
        let mut warnings = Vec::new();
        let entry = self
            .lookup_entry(store_id, product_id, product_name, &mut warnings)
            .await?;

        let mut miss = RecipePathMiss::NoLink;
        if let Some(entry) = &entry {
            match self.try_recipe_path(store_id, entry, &mut warnings).await? {
                Ok(resolved) => {
                    return Ok(ResolvedRecipe {
                        warnings,
                        ..resolved
                    });
                }
                Err(reason) => miss = reason,
            }
        }

        // Template fallback: match by normalized product name.
        if let Some(resolved) = self
            .try_template_fallback(product_name, &mut warnings)
            .await?
        {
            return Ok(ResolvedRecipe {
                warnings,
                ..resolved
            });
        }

        let name = product_name.to_string();
        Err(if entry.is_none() {
            ResolutionError::NoCatalogEntry(name)
        } else {
            match miss {
                RecipePathMiss::NoLink => ResolutionError::NoTemplateMatch(name),
                RecipePathMiss::InactiveOrMissing => ResolutionError::InactiveRecipe(name),
                RecipePathMiss::Empty => ResolutionError::EmptyIngredients(name),
            }
        })
    }

    async fn lookup_entry(
        &self,
        store_id: &str,
        product_id: Option<&str>,
        product_name: &str,
        warnings: &mut Vec<String>,
    ) -> Result<Option<ProductCatalogEntry>, ResolutionError> {
        if let Some(id) = product_id {
            match self.store.catalog_entry_by_id(id).await? {
                Some(entry) if entry.store_id == store_id => return Ok(Some(entry)),
                Some(entry) => {
                    // Cross-store reference is a defect; fall through to
                    // by-name lookup in the correct store.
                    warn!(
                        product_id = id,
                        entry_store = %entry.store_id,
                        requested_store = %store_id,
                        "catalog entry belongs to another store"
                    );
                    warnings.push(format!(
                        "catalog entry {id} belongs to store {}, expected {store_id}",
                        entry.store_id
                    ));
                }
                None => {
                    warnings.push(format!("stale product id {id}, falling back to name lookup"));
                }
            }
        }

        let normalized = normalize_name(product_name);
        Ok(self
            .store
            .catalog_entry_by_name(store_id, &normalized)
            .await?)
    }

    /// Ok(resolved) when the recipe path yields ingredients, Err(reason)
    /// otherwise.
    async fn try_recipe_path(
        &self,
        store_id: &str,
        entry: &ProductCatalogEntry,
        warnings: &mut Vec<String>,
    ) -> Result<Result<ResolvedRecipe, RecipePathMiss>, ResolutionError> {
        let Some(recipe_id) = &entry.recipe_id else {
            return Ok(Err(RecipePathMiss::NoLink));
        };

        let recipe = match self.store.recipe_by_id(recipe_id).await? {
            Some(recipe) if recipe.is_active && recipe.store_id == store_id => recipe,
            Some(recipe) if recipe.store_id != store_id => {
                warnings.push(format!(
                    "recipe {recipe_id} belongs to store {}, expected {store_id}",
                    recipe.store_id
                ));
                return Ok(Err(RecipePathMiss::InactiveOrMissing));
            }
            Some(_) => return Ok(Err(RecipePathMiss::InactiveOrMissing)),
            None => {
                warnings.push(format!(
                    "catalog entry {} references missing recipe {recipe_id}",
                    entry.id
                ));
                return Ok(Err(RecipePathMiss::InactiveOrMissing));
            }
        };

        let rows = self.store.recipe_ingredients(recipe_id).await?;
        if rows.is_empty() {
            return Ok(Err(RecipePathMiss::Empty));
        }

        let mut ingredients = Vec::with_capacity(rows.len());
        for row in rows {
            if row.inventory_stock_id.is_none() {
                // Flagged individually; the engine applies a partial
                // deduction and surfaces the gap instead of failing the line.
                warnings.push(format!(
                    "ingredient '{}' has no inventory mapping",
                    row.ingredient_name
                ));
            }
            ingredients.push(ResolvedIngredient {
                ingredient_name: row.ingredient_name,
                quantity_per_unit: row.quantity,
                unit: row.unit,
                inventory_stock_id: row.inventory_stock_id,
            });
        }

        let category = match &recipe.template_id {
            Some(template_id) => self
                .store
                .template_by_id(template_id)
                .await?
                .map(|t| t.category),
            None => {
                warnings.push(format!("recipe {} has no template link", recipe.id));
                None
            }
        };

        Ok(Ok(ResolvedRecipe {
            ingredients,
            source: IngredientSource::Recipe,
            category,
            warnings: Vec::new(),
        }))
    }

    async fn try_template_fallback(
        &self,
        product_name: &str,
        warnings: &mut Vec<String>,
    ) -> Result<Option<ResolvedRecipe>, ResolutionError> {
        let normalized = normalize_name(product_name);
        let Some(template) = self.store.template_by_name(&normalized).await? else {
            return Ok(None);
        };
        if !template.is_active {
            warnings.push(format!("template '{}' is inactive", template.name));
            return Ok(None);
        }

        let rows = self.store.template_ingredients(&template.id).await?;
        if rows.is_empty() {
            warnings.push(format!(
                "template '{}' has an empty ingredient list",
                template.name
            ));
            return Ok(None);
        }

        warnings.push(format!(
            "using template fallback for '{product_name}' (template {})",
            template.id
        ));

        let ingredients = rows
            .into_iter()
            .map(|row| ResolvedIngredient {
                ingredient_name: row.ingredient_name,
                quantity_per_unit: row.quantity,
                unit: row.unit,
                // Template rows carry no store mapping; the engine matches
                // them against live inventory by name.
                inventory_stock_id: None,
            })
            .collect();

        Ok(Some(ResolvedRecipe {
            ingredients,
            source: IngredientSource::TemplateFallback,
            category: Some(template.category),
            warnings: Vec::new(),
        }))
    }
}
