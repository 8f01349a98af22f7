//! Transaction Orchestrator
//!
//! Per-transaction state machine:
//!
//! ```text
//! PENDING → PROCESSING → { COMPLETED | PARTIALLY_FAILED | FAILED }
//! ```
//!
//! Line items run sequentially; correctness rests on per-item idempotence,
//! not speed. The default policy keeps processing after a failed item and
//! accumulates errors; failed states stay discoverable for the reconcile
//! service rather than blocking the sale path.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use rust_decimal::Decimal;
use shared::SaleInput;
use shared::models::{DeductionStatus, MovementType, SaleTransaction, TransactionItem};
use shared::response::TransactionDeductionResult;
use tracing::{info, warn};

use crate::core::{EnginePolicy, FailurePolicy};
use crate::deduction::DeductionEngine;
use crate::store::Datastore;

pub struct TransactionOrchestrator {
    engine: Arc<DeductionEngine>,
    store: Arc<dyn Datastore>,
    policy: EnginePolicy,
}

impl TransactionOrchestrator {
    pub fn new(engine: Arc<DeductionEngine>, store: Arc<dyn Datastore>, policy: EnginePolicy) -> Self {
        Self {
            engine,
            store,
            policy,
        }
    }

    /// Orchestrate deduction for a completed sale handed over by the POS.
    pub async fn process_sale(&self, sale: &SaleInput) -> TransactionDeductionResult {
        let transaction = sale_to_transaction(sale);
        if let Err(e) = self.store.upsert_transaction(transaction.clone()).await {
            // The sale record is the POS's source of truth; a persistence
            // hiccup here must not stall checkout.
            warn!(transaction_id = %transaction.id, error = %e, "could not persist transaction");
        }
        self.run(&transaction, MovementType::Deduction).await
    }

    /// Orchestrate deduction for an already-stored transaction. Used by the
    /// reconcile service with [`MovementType::Correction`].
    pub async fn run(
        &self,
        transaction: &SaleTransaction,
        movement_type: MovementType,
    ) -> TransactionDeductionResult {
        let started = Instant::now();
        let transaction_id = transaction.id.as_str();

        self.record_status(transaction_id, DeductionStatus::Processing)
            .await;

        let mut lines = Vec::with_capacity(transaction.items.len());
        let mut failed = 0usize;
        for item in &transaction.items {
            let line = self
                .engine
                .deduct_line_item(transaction_id, &transaction.store_id, item, movement_type)
                .await;
            let success = line.success;
            lines.push(line);
            if !success {
                failed += 1;
                if self.policy.failure_policy == FailurePolicy::AbortOnFirst {
                    warn!(
                        transaction_id,
                        "aborting remaining line items after failure"
                    );
                    break;
                }
            }
        }

        let succeeded = lines.iter().filter(|l| l.success).count();
        let status = if failed == 0 {
            DeductionStatus::Completed
        } else if succeeded > 0 {
            DeductionStatus::PartiallyFailed
        } else {
            DeductionStatus::Failed
        };
        self.record_status(transaction_id, status).await;

        let errors: Vec<String> = lines
            .iter()
            .flat_map(|l| {
                l.errors
                    .iter()
                    .map(|e| format!("{}: {e}", l.line_name))
                    .collect::<Vec<_>>()
            })
            .collect();
        let result = TransactionDeductionResult {
            transaction_id: transaction_id.to_string(),
            status,
            deducted_count: lines.iter().map(|l| l.deducted.len()).sum(),
            skipped_count: lines.iter().map(|l| l.skipped.len()).sum(),
            errors,
            lines,
            elapsed_ms: started.elapsed().as_millis() as u64,
        };

        info!(
            transaction_id,
            store_id = %transaction.store_id,
            status = ?status,
            deducted = result.deducted_count,
            skipped = result.skipped_count,
            errors = result.errors.len(),
            elapsed_ms = result.elapsed_ms,
            "transaction deduction finished"
        );
        result
    }

    async fn record_status(&self, transaction_id: &str, status: DeductionStatus) {
        if let Err(e) = self.store.set_deduction_status(transaction_id, status).await {
            warn!(transaction_id, status = ?status, error = %e, "could not record deduction status");
        }
    }
}

fn sale_to_transaction(sale: &SaleInput) -> SaleTransaction {
    let items: Vec<TransactionItem> = sale
        .items
        .iter()
        .map(|line| TransactionItem {
            product_id: line.product_id.clone(),
            name: line.name.clone(),
            quantity: line.quantity,
            unit_price: Decimal::try_from(line.unit_price).unwrap_or_default(),
        })
        .collect();
    let total = items
        .iter()
        .map(|i| i.unit_price * Decimal::from(i.quantity))
        .sum();
    SaleTransaction {
        id: sale.transaction_id.clone(),
        store_id: sale.store_id.clone(),
        total,
        created_at: Utc::now(),
        items,
        deduction_status: DeductionStatus::Pending,
    }
}
