//! Per-line-item deduction
//!
//! One line item is one logical unit: every applicable ingredient is
//! attempted even when a sibling fails, so the movement log captures as much
//! as the data allows. Stock is re-read immediately before each write
//! decision; an in-memory snapshot would race concurrent sales.

use std::sync::Arc;

use shared::models::{InventoryMovement, MovementType, TransactionItem};
use shared::response::{DeductedItem, LineDeductionResult};
use tracing::{info, warn};

use crate::core::EnginePolicy;
use crate::matching::{MatchOutcome, match_ingredient};
use crate::mixmatch::parse_composite;
use crate::resolver::{RecipeResolver, ResolvedIngredient};
use crate::store::Datastore;

/// Movement types that make a later deduction of the same
/// (item, transaction) pair a no-op.
const IDEMPOTENCE_TYPES: [MovementType; 2] = [MovementType::Deduction, MovementType::Correction];

pub struct DeductionEngine {
    store: Arc<dyn Datastore>,
    resolver: RecipeResolver,
    policy: EnginePolicy,
}

impl DeductionEngine {
    pub fn new(store: Arc<dyn Datastore>, policy: EnginePolicy) -> Self {
        let resolver = RecipeResolver::new(store.clone());
        Self {
            store,
            resolver,
            policy,
        }
    }

    pub fn resolver(&self) -> &RecipeResolver {
        &self.resolver
    }

    /// Deduct inventory for one transaction line item.
    ///
    /// `movement_type` is [`MovementType::Deduction`] for live sales and
    /// [`MovementType::Correction`] for reconcile re-runs; both share the
    /// same idempotence probe, so re-applying either is a no-op.
    pub async fn deduct_line_item(
        &self,
        transaction_id: &str,
        store_id: &str,
        item: &TransactionItem,
        movement_type: MovementType,
    ) -> LineDeductionResult {
        let mut result = LineDeductionResult {
            line_name: item.name.clone(),
            success: false,
            deducted: Vec::new(),
            skipped: Vec::new(),
            errors: Vec::new(),
        };

        let (base_name, _) = crate::mixmatch::split_display_name(&item.name);
        let resolved = match self
            .resolver
            .resolve(store_id, item.product_id.as_deref(), &base_name)
            .await
        {
            Ok(resolved) => resolved,
            Err(e) => {
                warn!(
                    transaction_id,
                    store_id,
                    product = %item.name,
                    error = %e,
                    "ingredient resolution failed"
                );
                result.errors.push(e.to_string());
                return result;
            }
        };
        for warning in &resolved.warnings {
            warn!(transaction_id, product = %item.name, "{warning}");
        }

        let vocabulary = resolved
            .category
            .as_deref()
            .and_then(|c| self.policy.vocabulary_for(c));
        let parsed = parse_composite(
            &item.name,
            &resolved.ingredients,
            vocabulary,
            &self.policy.packaging_keywords,
        );
        for warning in &parsed.warnings {
            warn!(transaction_id, product = %item.name, "{warning}");
        }

        // Store inventory is only fetched when an ingredient needs name
        // matching (template fallback, or a recipe row with no mapping).
        let needs_matching = parsed
            .applicable
            .iter()
            .any(|i| i.inventory_stock_id.is_none());
        let store_inventory = if needs_matching {
            match self.store.inventory_by_store(store_id).await {
                Ok(items) => items,
                Err(e) => {
                    result
                        .errors
                        .push(format!("cannot load store inventory: {e}"));
                    return result;
                }
            }
        } else {
            Vec::new()
        };

        for ingredient in &parsed.applicable {
            self.deduct_ingredient(
                transaction_id,
                store_id,
                item,
                ingredient,
                &store_inventory,
                movement_type,
                &mut result,
            )
            .await;
        }

        result.success = result.errors.is_empty();
        info!(
            transaction_id,
            store_id,
            product = %item.name,
            deducted = result.deducted.len(),
            skipped = result.skipped.len(),
            errors = result.errors.len(),
            "line item deduction finished"
        );
        result
    }

    /// Apply one ingredient deduction, recording the outcome in `result`.
    #[allow(clippy::too_many_arguments)]
    async fn deduct_ingredient(
        &self,
        transaction_id: &str,
        store_id: &str,
        item: &TransactionItem,
        ingredient: &ResolvedIngredient,
        store_inventory: &[shared::models::InventoryItem],
        movement_type: MovementType,
        result: &mut LineDeductionResult,
    ) {
        let name = &ingredient.ingredient_name;

        // Mapping from the recipe row when present, else name matching
        // against live store inventory.
        let target_id = match &ingredient.inventory_stock_id {
            Some(id) => id.clone(),
            None => match match_ingredient(name, store_inventory) {
                MatchOutcome::Match(inv) => inv.id,
                MatchOutcome::Ambiguous(candidates) => {
                    // Live deduction resolves ambiguity deterministically
                    // (stable id order) and flags the choice.
                    warn!(
                        transaction_id,
                        ingredient = %name,
                        candidates = candidates.len(),
                        "ambiguous inventory match, using first candidate"
                    );
                    match candidates.into_iter().next() {
                        Some(inv) => inv.id,
                        None => {
                            result.skipped.push(format!("no inventory match for '{name}'"));
                            return;
                        }
                    }
                }
                MatchOutcome::NoMatch => {
                    result
                        .skipped
                        .push(format!("no inventory match for '{name}'"));
                    return;
                }
            },
        };

        // Idempotence: an existing movement for this pair means this
        // deduction already happened (retry/replay).
        match self
            .store
            .movement_exists(&target_id, transaction_id, &IDEMPOTENCE_TYPES)
            .await
        {
            Ok(true) => {
                result
                    .skipped
                    .push(format!("'{name}' already deducted for this transaction"));
                return;
            }
            Ok(false) => {}
            Err(e) => {
                result
                    .errors
                    .push(format!("idempotence check failed for '{name}': {e}"));
                return;
            }
        }

        let required = ingredient.quantity_per_unit * f64::from(item.quantity);

        // Re-read current stock; never trust a snapshot across suspension
        // points.
        let current = match self.store.inventory_by_id(&target_id).await {
            Ok(Some(inv)) => inv,
            Ok(None) => {
                result
                    .errors
                    .push(format!("inventory item {target_id} for '{name}' not found"));
                return;
            }
            Err(e) => {
                result
                    .errors
                    .push(format!("stock read failed for '{name}': {e}"));
                return;
            }
        };

        if current.stock_quantity < required {
            result.errors.push(format!(
                "insufficient stock for '{name}': required {required}, available {}",
                current.stock_quantity
            ));
            return;
        }

        let new_stock = (current.stock_quantity - required).max(0.0);
        let updated = match self.store.update_stock(&target_id, new_stock).await {
            Ok(updated) => updated,
            Err(e) => {
                result
                    .errors
                    .push(format!("stock write failed for '{name}': {e}"));
                return;
            }
        };

        // Movement row only after the stock write succeeded; the idempotence
        // probe keys off its existence.
        let movement = InventoryMovement {
            id: None,
            inventory_stock_id: target_id.clone(),
            store_id: store_id.to_string(),
            movement_type,
            quantity_delta: -required,
            previous_quantity: current.stock_quantity,
            new_quantity: updated.stock_quantity,
            reference_id: transaction_id.to_string(),
            note: Some(format!("{} x{}", item.name, item.quantity)),
            actor: self.policy.actor.clone(),
            created_at: chrono::Utc::now(),
        };
        if let Err(e) = self.store.insert_movement(movement).await {
            // Stock already moved without its audit row; this must be loud.
            tracing::error!(
                transaction_id,
                inventory_stock_id = %target_id,
                ingredient = %name,
                error = %e,
                "stock updated but movement insert failed"
            );
            result
                .errors
                .push(format!("movement insert failed for '{name}': {e}"));
            return;
        }

        result.deducted.push(DeductedItem {
            inventory_stock_id: target_id,
            item_name: current.item,
            quantity_deducted: required,
            new_stock: updated.stock_quantity,
        });
    }
}
