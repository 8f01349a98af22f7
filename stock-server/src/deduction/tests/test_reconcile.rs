use super::*;

use shared::models::MovementType;
use crate::store::Datastore;

#[tokio::test]
async fn test_rollback_restores_exactly() {
    let ctx = create_test_context();
    seed_kitkat_store(&ctx);

    ctx.state
        .orchestrator
        .process_sale(&sale("tx-1", vec![sale_line("KitKat Croffle", 3)]))
        .await;
    assert_eq!(stock_of(&ctx, "inv-kitkat").await, 17.0);

    let result = ctx.state.reconcile.rollback("tx-1").await.unwrap();
    assert!(result.success);
    assert_eq!(result.restored.len(), 3);

    assert_eq!(stock_of(&ctx, "inv-croissant").await, 50.0);
    assert_eq!(stock_of(&ctx, "inv-kitkat").await, 20.0);
    assert_eq!(stock_of(&ctx, "inv-cream").await, 30.0);

    // The original deduction rows stay untouched; each restoration appends
    // a compensating row.
    let movements = ctx.store.movements_for_reference("tx-1").await.unwrap();
    assert_eq!(movements.len(), 6);
    let deductions = movements
        .iter()
        .filter(|m| m.movement_type == MovementType::Deduction)
        .count();
    let rollbacks = movements
        .iter()
        .filter(|m| m.movement_type == MovementType::Rollback)
        .count();
    assert_eq!(deductions, 3);
    assert_eq!(rollbacks, 3);

    let kitkat_rollback = movements
        .iter()
        .find(|m| m.inventory_stock_id == "inv-kitkat" && m.movement_type == MovementType::Rollback)
        .unwrap();
    assert_eq!(kitkat_rollback.quantity_delta, 3.0);
}

#[tokio::test]
async fn test_rollback_is_idempotent() {
    let ctx = create_test_context();
    seed_kitkat_store(&ctx);

    ctx.state
        .orchestrator
        .process_sale(&sale("tx-1", vec![sale_line("KitKat Croffle", 1)]))
        .await;

    let first = ctx.state.reconcile.rollback("tx-1").await.unwrap();
    assert_eq!(first.restored.len(), 3);

    let second = ctx.state.reconcile.rollback("tx-1").await.unwrap();
    assert!(second.success);
    assert!(second.restored.is_empty());
    assert_eq!(second.skipped.len(), 3);

    // Stock restored exactly once.
    assert_eq!(stock_of(&ctx, "inv-kitkat").await, 20.0);
    assert_eq!(ctx.store.movement_count(), 6);
}

#[tokio::test]
async fn test_rollback_without_deductions_is_noop() {
    let ctx = create_test_context();
    seed_kitkat_store(&ctx);

    let result = ctx.state.reconcile.rollback("tx-unknown").await.unwrap();
    assert!(result.success);
    assert!(result.restored.is_empty());
    assert_eq!(ctx.store.movement_count(), 0);
}

#[tokio::test]
async fn test_correction_applies_missed_transaction() {
    let ctx = create_test_context();
    seed_kitkat_store(&ctx);

    // A completed sale that never went through deduction: zero movements.
    ctx.store.seed_transaction(stored_transaction(
        "tx-old",
        vec![transaction_item("KitKat Croffle", 2)],
    ));

    let result = ctx
        .state
        .reconcile
        .correct_transaction("tx-old")
        .await
        .unwrap();
    assert!(result.success);
    assert_eq!(stock_of(&ctx, "inv-kitkat").await, 18.0);

    let movements = ctx.store.movements_for_reference("tx-old").await.unwrap();
    assert_eq!(movements.len(), 3);
    assert!(
        movements
            .iter()
            .all(|m| m.movement_type == MovementType::Correction)
    );
}

#[tokio::test]
async fn test_correction_is_idempotent() {
    let ctx = create_test_context();
    seed_kitkat_store(&ctx);
    ctx.store.seed_transaction(stored_transaction(
        "tx-old",
        vec![transaction_item("KitKat Croffle", 1)],
    ));

    let first = ctx
        .state
        .reconcile
        .correct_transaction("tx-old")
        .await
        .unwrap();
    assert!(first.success);

    let second = ctx
        .state
        .reconcile
        .correct_transaction("tx-old")
        .await
        .unwrap();
    assert!(second.success);
    assert_eq!(second.deduction.deducted_count, 0);
    assert_eq!(second.deduction.skipped_count, 3);

    assert_eq!(stock_of(&ctx, "inv-kitkat").await, 19.0);
    assert_eq!(ctx.store.movement_count(), 3);
}

#[tokio::test]
async fn test_correction_skips_already_deducted_ingredients() {
    let ctx = create_test_context();
    seed_kitkat_store(&ctx);

    // Live deduction already covered this sale.
    ctx.state
        .orchestrator
        .process_sale(&sale("tx-1", vec![sale_line("KitKat Croffle", 1)]))
        .await;

    let result = ctx
        .state
        .reconcile
        .correct_transaction("tx-1")
        .await
        .unwrap();
    assert!(result.success);
    assert_eq!(result.deduction.deducted_count, 0);
    assert_eq!(stock_of(&ctx, "inv-kitkat").await, 19.0);
}

#[tokio::test]
async fn test_correction_unknown_transaction_errors() {
    let ctx = create_test_context();
    seed_kitkat_store(&ctx);

    let err = ctx.state.reconcile.correct_transaction("tx-nope").await;
    assert!(err.is_err());
}

#[tokio::test]
async fn test_failed_transactions_are_candidates() {
    let ctx = create_test_context();
    seed_kitkat_store(&ctx);

    ctx.state
        .orchestrator
        .process_sale(&sale(
            "tx-bad",
            vec![sale_line("Ube Croffle", 1), sale_line("KitKat Croffle", 1)],
        ))
        .await;
    ctx.state
        .orchestrator
        .process_sale(&sale("tx-good", vec![sale_line("KitKat Croffle", 1)]))
        .await;

    let candidates = ctx.state.reconcile.candidates().await.unwrap();
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].id, "tx-bad");
}
