use super::*;

use crate::core::FailurePolicy;
use crate::store::Datastore;

#[tokio::test]
async fn test_terminal_status_persisted() {
    let ctx = create_test_context();
    seed_kitkat_store(&ctx);

    ctx.state
        .orchestrator
        .process_sale(&sale("tx-1", vec![sale_line("KitKat Croffle", 1)]))
        .await;

    let stored = ctx
        .store
        .transaction_by_id("tx-1")
        .await
        .unwrap()
        .expect("transaction persisted");
    assert_eq!(stored.deduction_status, DeductionStatus::Completed);
    assert!(stored.deduction_status.is_terminal());
}

#[tokio::test]
async fn test_partial_failure_continues_processing() {
    let ctx = create_test_context();
    seed_kitkat_store(&ctx);

    let result = ctx
        .state
        .orchestrator
        .process_sale(&sale(
            "tx-1",
            vec![
                sale_line("Ube Croffle", 1), // unknown product, fails
                sale_line("KitKat Croffle", 1),
            ],
        ))
        .await;

    // Default policy keeps going: the valid line still deducts.
    assert_eq!(result.status, DeductionStatus::PartiallyFailed);
    assert_eq!(result.lines.len(), 2);
    assert!(!result.lines[0].success);
    assert!(result.lines[1].success);
    assert_eq!(stock_of(&ctx, "inv-kitkat").await, 19.0);

    let stored = ctx.store.transaction_by_id("tx-1").await.unwrap().unwrap();
    assert_eq!(stored.deduction_status, DeductionStatus::PartiallyFailed);
}

#[tokio::test]
async fn test_all_lines_failing_ends_failed() {
    let ctx = create_test_context();
    seed_kitkat_store(&ctx);

    let result = ctx
        .state
        .orchestrator
        .process_sale(&sale(
            "tx-1",
            vec![sale_line("Ube Croffle", 1), sale_line("Matcha Croffle", 1)],
        ))
        .await;

    assert_eq!(result.status, DeductionStatus::Failed);
    assert_eq!(result.deducted_count, 0);
    assert_eq!(result.errors.len(), 2);
}

#[tokio::test]
async fn test_abort_on_first_stops_remaining_items() {
    let mut config = test_config();
    config.policy.failure_policy = FailurePolicy::AbortOnFirst;
    let ctx = create_test_context_with(config);
    seed_kitkat_store(&ctx);

    let result = ctx
        .state
        .orchestrator
        .process_sale(&sale(
            "tx-1",
            vec![sale_line("Ube Croffle", 1), sale_line("KitKat Croffle", 1)],
        ))
        .await;

    // The second line was never attempted.
    assert_eq!(result.lines.len(), 1);
    assert_eq!(result.status, DeductionStatus::Failed);
    assert_eq!(stock_of(&ctx, "inv-kitkat").await, 20.0);
}

#[tokio::test]
async fn test_line_errors_are_prefixed_with_product() {
    let ctx = create_test_context();
    seed_kitkat_store(&ctx);

    let result = ctx
        .state
        .orchestrator
        .process_sale(&sale("tx-1", vec![sale_line("Ube Croffle", 1)]))
        .await;

    assert!(result.errors[0].starts_with("Ube Croffle:"));
}
