//! Reconcile service implementation

use std::sync::Arc;

use shared::models::{
    DeductionStatus, InventoryMovement, MovementType, SaleTransaction,
};
use tracing::{info, warn};

use crate::core::EnginePolicy;
use crate::deduction::TransactionOrchestrator;
use crate::store::{Datastore, StoreError, StoreResult};

use super::types::{ReconciliationResult, RestoredItem, RollbackResult};

pub struct ReconcileService {
    store: Arc<dyn Datastore>,
    orchestrator: Arc<TransactionOrchestrator>,
    policy: EnginePolicy,
}

impl ReconcileService {
    pub fn new(
        store: Arc<dyn Datastore>,
        orchestrator: Arc<TransactionOrchestrator>,
        policy: EnginePolicy,
    ) -> Self {
        Self {
            store,
            orchestrator,
            policy,
        }
    }

    /// Reverse every applied, not-yet-compensated deduction of a
    /// transaction.
    ///
    /// The movement log is authoritative: each negative movement row for the
    /// transaction is restored exactly once, regardless of what the recipe
    /// data looks like today. Restorations append a `rollback` movement; the
    /// original rows stay untouched.
    pub async fn rollback(&self, transaction_id: &str) -> StoreResult<RollbackResult> {
        let mut result = RollbackResult {
            transaction_id: transaction_id.to_string(),
            success: false,
            restored: Vec::new(),
            skipped: Vec::new(),
            issues: Vec::new(),
        };

        let movements = self.store.movements_for_reference(transaction_id).await?;
        let deductions: Vec<&InventoryMovement> = movements
            .iter()
            .filter(|m| {
                matches!(
                    m.movement_type,
                    MovementType::Deduction | MovementType::Correction
                ) && m.quantity_delta < 0.0
            })
            .collect();

        if deductions.is_empty() {
            result.success = true;
            result
                .skipped
                .push("no applied deductions to roll back".to_string());
            return Ok(result);
        }

        for movement in deductions {
            let item_id = movement.inventory_stock_id.as_str();

            let already_reversed = movements
                .iter()
                .any(|m| m.is_compensation() && m.inventory_stock_id == item_id);
            if already_reversed {
                result
                    .skipped
                    .push(format!("inventory item {item_id} already restored"));
                continue;
            }

            let current = match self.store.inventory_by_id(item_id).await {
                Ok(Some(inv)) => inv,
                Ok(None) => {
                    result
                        .issues
                        .push(format!("inventory item {item_id} not found"));
                    continue;
                }
                Err(e) => {
                    result
                        .issues
                        .push(format!("stock read failed for {item_id}: {e}"));
                    continue;
                }
            };

            let restore = -movement.quantity_delta;
            let new_stock = current.stock_quantity + restore;
            let updated = match self.store.update_stock(item_id, new_stock).await {
                Ok(updated) => updated,
                Err(e) => {
                    result
                        .issues
                        .push(format!("stock restore failed for {item_id}: {e}"));
                    continue;
                }
            };

            let compensation = InventoryMovement {
                id: None,
                inventory_stock_id: item_id.to_string(),
                store_id: movement.store_id.clone(),
                movement_type: MovementType::Rollback,
                quantity_delta: restore,
                previous_quantity: current.stock_quantity,
                new_quantity: updated.stock_quantity,
                reference_id: transaction_id.to_string(),
                note: Some(format!("rollback of transaction {transaction_id}")),
                actor: self.policy.actor.clone(),
                created_at: chrono::Utc::now(),
            };
            if let Err(e) = self.store.insert_movement(compensation).await {
                tracing::error!(
                    transaction_id,
                    inventory_stock_id = %item_id,
                    error = %e,
                    "stock restored but rollback movement insert failed"
                );
                result
                    .issues
                    .push(format!("rollback movement insert failed for {item_id}: {e}"));
                continue;
            }

            result.restored.push(RestoredItem {
                inventory_stock_id: item_id.to_string(),
                item_name: current.item,
                quantity_restored: restore,
                new_stock: updated.stock_quantity,
            });
        }

        result.success = result.issues.is_empty();
        info!(
            transaction_id,
            restored = result.restored.len(),
            skipped = result.skipped.len(),
            issues = result.issues.len(),
            "rollback finished"
        );
        Ok(result)
    }

    /// Re-run resolution and deduction for a historical transaction, as if
    /// processing it live. Ingredients that already have a movement row are
    /// skipped by the engine's idempotence probe, so invoking this on a
    /// fully-deducted transaction is a no-op.
    pub async fn correct_transaction(
        &self,
        transaction_id: &str,
    ) -> StoreResult<ReconciliationResult> {
        let transaction = self
            .store
            .transaction_by_id(transaction_id)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("transaction {transaction_id}")))?;

        if transaction.items.is_empty() {
            warn!(transaction_id, "transaction has no line items to correct");
        }

        let deduction = self
            .orchestrator
            .run(&transaction, MovementType::Correction)
            .await;

        let success = deduction.status == DeductionStatus::Completed;
        let issues = deduction.errors.clone();
        Ok(ReconciliationResult {
            transaction_id: transaction_id.to_string(),
            success,
            deduction,
            issues,
        })
    }

    /// Transactions in a failed terminal state, the manual-correction
    /// worklist.
    pub async fn candidates(&self) -> StoreResult<Vec<SaleTransaction>> {
        self.store
            .transactions_by_status(&[DeductionStatus::PartiallyFailed, DeductionStatus::Failed])
            .await
    }
}
