//! Audit service implementation

use std::collections::HashMap;
use std::sync::Arc;

use shared::models::{Recipe, RecipeIngredient, Store, TemplateIngredient};
use shared::normalize_name;
use tracing::info;

use crate::matching::{MatchOutcome, match_ingredient};
use crate::store::{Datastore, StoreResult};

use super::types::{
    ConsistencyClass, DuplicateGroup, LinkageReport, LowStockItem, RecipeConsistency,
    RepairAction, RepairKind, RepairResult, UnmappedProduct,
};

/// Quantity comparisons tolerate float noise from the backend.
const QUANTITY_EPSILON: f64 = 1e-9;

pub struct LinkageAuditService {
    store: Arc<dyn Datastore>,
}

impl LinkageAuditService {
    pub fn new(store: Arc<dyn Datastore>) -> Self {
        Self { store }
    }

    async fn scoped_stores(&self, store_id: Option<&str>) -> StoreResult<Vec<Store>> {
        let stores = self.store.list_stores().await?;
        Ok(match store_id {
            Some(id) => stores.into_iter().filter(|s| s.id == id).collect(),
            None => stores,
        })
    }

    /// Scan product ↔ recipe ↔ template ↔ inventory linkages, one store or
    /// all of them. Read-only.
    pub async fn audit_linkages(&self, store_id: Option<&str>) -> StoreResult<LinkageReport> {
        let stores = self.scoped_stores(store_id).await?;
        let mut report = LinkageReport {
            generated_at: chrono::Utc::now(),
            stores_scanned: stores.len(),
            consistency: Vec::new(),
            unmapped: Vec::new(),
            duplicates: Vec::new(),
            low_stock: Vec::new(),
            issues: Vec::new(),
            ok: false,
        };
        if let Some(id) = store_id
            && stores.is_empty()
        {
            report.issues.push(format!("store {id} not found"));
        }

        for store in &stores {
            self.audit_store(store, &mut report).await?;
        }

        report.ok = report.issues.is_empty()
            && report.unmapped.is_empty()
            && report.duplicates.is_empty()
            && report
                .consistency
                .iter()
                .all(|c| c.class == ConsistencyClass::Consistent);
        info!(
            stores = report.stores_scanned,
            unmapped = report.unmapped.len(),
            duplicates = report.duplicates.len(),
            issues = report.issues.len(),
            ok = report.ok,
            "linkage audit finished"
        );
        Ok(report)
    }

    async fn audit_store(&self, store: &Store, report: &mut LinkageReport) -> StoreResult<()> {
        let store_id = store.id.as_str();
        let inventory = self.store.inventory_by_store(store_id).await?;
        let inventory_ids: Vec<&str> = inventory.iter().map(|i| i.id.as_str()).collect();

        for item in &inventory {
            if item.is_active && item.is_low() {
                report.low_stock.push(LowStockItem {
                    store_id: store_id.to_string(),
                    inventory_stock_id: item.id.clone(),
                    item: item.item.clone(),
                    stock_quantity: item.stock_quantity,
                    minimum_threshold: item.minimum_threshold,
                });
            }
        }

        // Catalog side: broken recipe links and duplicate rows.
        let entries = self.store.catalog_entries_by_store(store_id).await?;
        let mut by_name: HashMap<String, Vec<String>> = HashMap::new();
        for entry in &entries {
            by_name
                .entry(normalize_name(&entry.product_name))
                .or_default()
                .push(entry.id.clone());

            match &entry.recipe_id {
                None => {
                    let mut issues = vec!["no recipe linked".to_string()];
                    let normalized = normalize_name(&entry.product_name);
                    if self.store.template_by_name(&normalized).await?.is_none() {
                        issues.push("no template fallback by name".to_string());
                    }
                    report.unmapped.push(UnmappedProduct {
                        store_id: store_id.to_string(),
                        product_id: Some(entry.id.clone()),
                        product_name: entry.product_name.clone(),
                        issues,
                    });
                }
                Some(recipe_id) => match self.store.recipe_by_id(recipe_id).await? {
                    None => report.issues.push(format!(
                        "catalog entry '{}' ({store_id}) references missing recipe {recipe_id}",
                        entry.product_name
                    )),
                    Some(recipe) if recipe.store_id != *store_id => {
                        report.issues.push(format!(
                            "catalog entry '{}' ({store_id}) references recipe in store {}",
                            entry.product_name, recipe.store_id
                        ));
                    }
                    Some(recipe) if !recipe.is_active => {
                        report.issues.push(format!(
                            "catalog entry '{}' ({store_id}) references inactive recipe {}",
                            entry.product_name, recipe.id
                        ));
                    }
                    Some(_) => {}
                },
            }
        }
        for (normalized_name, entry_ids) in by_name {
            if entry_ids.len() > 1 {
                report.duplicates.push(DuplicateGroup {
                    store_id: store_id.to_string(),
                    normalized_name,
                    entry_ids,
                });
            }
        }

        // Recipe side: template consistency and ingredient mappings.
        let recipes = self.store.recipes_by_store(store_id).await?;
        for recipe in &recipes {
            let rows = self.store.recipe_ingredients(&recipe.id).await?;

            let unmapped_issues: Vec<String> = rows
                .iter()
                .filter_map(|row| match &row.inventory_stock_id {
                    None => Some(format!("ingredient '{}' unmapped", row.ingredient_name)),
                    Some(id) if !inventory_ids.contains(&id.as_str()) => Some(format!(
                        "ingredient '{}' mapped to unknown or cross-store item {id}",
                        row.ingredient_name
                    )),
                    Some(_) => None,
                })
                .collect();
            if !unmapped_issues.is_empty() {
                report.unmapped.push(UnmappedProduct {
                    store_id: store_id.to_string(),
                    product_id: None,
                    product_name: recipe.name.clone(),
                    issues: unmapped_issues,
                });
            }

            self.audit_recipe_consistency(recipe, &rows, report).await?;
        }

        Ok(())
    }

    async fn audit_recipe_consistency(
        &self,
        recipe: &Recipe,
        rows: &[RecipeIngredient],
        report: &mut LinkageReport,
    ) -> StoreResult<()> {
        let Some(template_id) = &recipe.template_id else {
            report.issues.push(format!(
                "recipe '{}' ({}) has no template link",
                recipe.name, recipe.store_id
            ));
            return Ok(());
        };
        let Some(template) = self.store.template_by_id(template_id).await? else {
            report.issues.push(format!(
                "recipe '{}' ({}) references missing template {template_id}",
                recipe.name, recipe.store_id
            ));
            return Ok(());
        };
        if !template.is_active {
            report.issues.push(format!(
                "recipe '{}' ({}) deployed from inactive template '{}'",
                recipe.name, recipe.store_id, template.name
            ));
        }

        let template_rows = self.store.template_ingredients(&template.id).await?;
        let (class, details) = compare_ingredients(&template_rows, rows);
        report.consistency.push(RecipeConsistency {
            store_id: recipe.store_id.clone(),
            recipe_id: recipe.id.clone(),
            recipe_name: recipe.name.clone(),
            template_id: Some(template.id),
            class,
            details,
        });
        Ok(())
    }

    /// Auto-fix the perfect-match cases only:
    ///
    /// - a catalog entry with no recipe link and exactly one recipe of the
    ///   same normalized name in its store
    /// - a recipe whose unmapped ingredients each have exactly one matcher
    ///   candidate; one ambiguous or missing ingredient leaves the whole
    ///   product untouched
    pub async fn repair_linkages(&self, store_id: Option<&str>) -> StoreResult<RepairResult> {
        let stores = self.scoped_stores(store_id).await?;
        let mut result = RepairResult {
            success: false,
            linked_products: 0,
            mapped_ingredients: 0,
            actions: Vec::new(),
            skipped: Vec::new(),
            issues: Vec::new(),
        };
        if let Some(id) = store_id
            && stores.is_empty()
        {
            result.issues.push(format!("store {id} not found"));
        }

        for store in &stores {
            self.repair_store(&store.id, &mut result).await?;
        }

        result.success = result.issues.is_empty();
        info!(
            linked = result.linked_products,
            mapped = result.mapped_ingredients,
            skipped = result.skipped.len(),
            "linkage repair finished"
        );
        Ok(result)
    }

    async fn repair_store(&self, store_id: &str, result: &mut RepairResult) -> StoreResult<()> {
        let recipes = self.store.recipes_by_store(store_id).await?;

        // Auto-link: entry → uniquely name-matched recipe.
        let entries = self.store.catalog_entries_by_store(store_id).await?;
        for entry in entries.iter().filter(|e| e.recipe_id.is_none()) {
            let normalized = normalize_name(&entry.product_name);
            let matches: Vec<&Recipe> = recipes
                .iter()
                .filter(|r| r.is_active && normalize_name(&r.name) == normalized)
                .collect();
            match matches.len() {
                1 => {
                    self.store
                        .set_catalog_recipe(&entry.id, &matches[0].id)
                        .await?;
                    result.linked_products += 1;
                    result.actions.push(RepairAction {
                        kind: RepairKind::LinkedRecipe,
                        store_id: store_id.to_string(),
                        target: entry.product_name.clone(),
                        detail: format!("linked to recipe {}", matches[0].id),
                    });
                }
                0 => result.skipped.push(format!(
                    "'{}' ({store_id}): no recipe with matching name",
                    entry.product_name
                )),
                _ => result.skipped.push(format!(
                    "'{}' ({store_id}): multiple recipes with matching name",
                    entry.product_name
                )),
            }
        }

        // Auto-map: all-or-nothing per recipe.
        let inventory = self.store.inventory_by_store(store_id).await?;
        for recipe in &recipes {
            let rows = self.store.recipe_ingredients(&recipe.id).await?;
            let unmapped: Vec<&RecipeIngredient> = rows
                .iter()
                .filter(|r| r.inventory_stock_id.is_none())
                .collect();
            if unmapped.is_empty() {
                continue;
            }

            let mut plan: Vec<(&RecipeIngredient, String)> = Vec::with_capacity(unmapped.len());
            let mut blocked = None;
            for row in &unmapped {
                match match_ingredient(&row.ingredient_name, &inventory) {
                    MatchOutcome::Match(item) => plan.push((row, item.id)),
                    MatchOutcome::Ambiguous(candidates) => {
                        blocked = Some(format!(
                            "'{}' ({store_id}): ingredient '{}' has {} inventory candidates",
                            recipe.name,
                            row.ingredient_name,
                            candidates.len()
                        ));
                        break;
                    }
                    MatchOutcome::NoMatch => {
                        blocked = Some(format!(
                            "'{}' ({store_id}): ingredient '{}' has no inventory candidate",
                            recipe.name, row.ingredient_name
                        ));
                        break;
                    }
                }
            }
            if let Some(reason) = blocked {
                result.skipped.push(reason);
                continue;
            }

            for (row, inventory_stock_id) in plan {
                self.store
                    .set_ingredient_mapping(&row.id, &inventory_stock_id)
                    .await?;
                result.mapped_ingredients += 1;
                result.actions.push(RepairAction {
                    kind: RepairKind::MappedIngredient,
                    store_id: store_id.to_string(),
                    target: format!("{} / {}", recipe.name, row.ingredient_name),
                    detail: format!("mapped to inventory item {inventory_stock_id}"),
                });
            }
        }

        Ok(())
    }
}

/// Compare deployed rows against template rows by normalized ingredient
/// name. Classification precedence: missing deployment > unit mismatch >
/// quantity mismatch (extra deployed rows count as quantity divergence).
fn compare_ingredients(
    template_rows: &[TemplateIngredient],
    recipe_rows: &[RecipeIngredient],
) -> (ConsistencyClass, Vec<String>) {
    let mut details = Vec::new();
    let mut missing = false;
    let mut unit_mismatch = false;
    let mut quantity_mismatch = false;

    for t in template_rows {
        let normalized = normalize_name(&t.ingredient_name);
        let Some(deployed) = recipe_rows
            .iter()
            .find(|r| normalize_name(&r.ingredient_name) == normalized)
        else {
            missing = true;
            details.push(format!("'{}' missing from deployed recipe", t.ingredient_name));
            continue;
        };
        if normalize_name(&deployed.unit) != normalize_name(&t.unit) {
            unit_mismatch = true;
            details.push(format!(
                "'{}' unit differs: recipe '{}', template '{}'",
                t.ingredient_name, deployed.unit, t.unit
            ));
        }
        if (deployed.quantity - t.quantity).abs() > QUANTITY_EPSILON {
            quantity_mismatch = true;
            details.push(format!(
                "'{}' quantity differs: recipe {}, template {}",
                t.ingredient_name, deployed.quantity, t.quantity
            ));
        }
    }
    for r in recipe_rows {
        let normalized = normalize_name(&r.ingredient_name);
        if !template_rows
            .iter()
            .any(|t| normalize_name(&t.ingredient_name) == normalized)
        {
            quantity_mismatch = true;
            details.push(format!(
                "'{}' not present in template",
                r.ingredient_name
            ));
        }
    }

    let class = if missing {
        ConsistencyClass::MissingDeployment
    } else if unit_mismatch {
        ConsistencyClass::UnitMismatch
    } else if quantity_mismatch {
        ConsistencyClass::QuantityMismatch
    } else {
        ConsistencyClass::Consistent
    };
    (class, details)
}
