use super::*;

use shared::models::MovementType;
use crate::store::Datastore;

#[tokio::test]
async fn test_clean_sale_deducts_all_ingredients() {
    let ctx = create_test_context();
    seed_kitkat_store(&ctx);

    let result = ctx
        .state
        .orchestrator
        .process_sale(&sale("tx-1", vec![sale_line("KitKat Croffle", 1)]))
        .await;

    assert_eq!(result.status, DeductionStatus::Completed);
    assert_eq!(result.deducted_count, 3);
    assert!(result.errors.is_empty());

    assert_eq!(stock_of(&ctx, "inv-croissant").await, 49.0);
    assert_eq!(stock_of(&ctx, "inv-kitkat").await, 19.0);
    assert_eq!(stock_of(&ctx, "inv-cream").await, 29.0);
}

#[tokio::test]
async fn test_sale_quantity_multiplies_deduction() {
    let ctx = create_test_context();
    seed_kitkat_store(&ctx);

    let result = ctx
        .state
        .orchestrator
        .process_sale(&sale("tx-1", vec![sale_line("KitKat Croffle", 3)]))
        .await;

    assert_eq!(result.status, DeductionStatus::Completed);
    assert_eq!(stock_of(&ctx, "inv-croissant").await, 47.0);
    assert_eq!(stock_of(&ctx, "inv-kitkat").await, 17.0);
}

#[tokio::test]
async fn test_idempotence_on_replay() {
    let ctx = create_test_context();
    seed_kitkat_store(&ctx);

    let item = transaction_item("KitKat Croffle", 1);
    let first = ctx
        .state
        .engine
        .deduct_line_item("tx-1", STORE_ID, &item, MovementType::Deduction)
        .await;
    assert!(first.success);
    assert_eq!(first.deducted.len(), 3);
    assert_eq!(ctx.store.movement_count(), 3);

    // Replaying the same transaction must be a no-op.
    let second = ctx
        .state
        .engine
        .deduct_line_item("tx-1", STORE_ID, &item, MovementType::Deduction)
        .await;
    assert!(second.success);
    assert!(second.deducted.is_empty());
    assert_eq!(second.skipped.len(), 3);

    assert_eq!(ctx.store.movement_count(), 3);
    assert_eq!(stock_of(&ctx, "inv-croissant").await, 49.0);
}

#[tokio::test]
async fn test_insufficient_stock_skips_only_that_ingredient() {
    let ctx = create_test_context();
    seed_kitkat_store(&ctx);
    // Only 2 KitKats left; a sale of 5 cannot deduct them.
    ctx.store.seed_inventory(inventory("inv-kitkat", "KitKat", 2.0));

    let result = ctx
        .state
        .orchestrator
        .process_sale(&sale("tx-1", vec![sale_line("KitKat Croffle", 5)]))
        .await;

    assert_eq!(result.status, DeductionStatus::Failed);
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].contains("insufficient stock"));

    // The failing ingredient is untouched, the rest still deducted.
    assert_eq!(stock_of(&ctx, "inv-kitkat").await, 2.0);
    assert_eq!(stock_of(&ctx, "inv-croissant").await, 45.0);
    assert_eq!(stock_of(&ctx, "inv-cream").await, 25.0);
}

#[tokio::test]
async fn test_stock_never_goes_negative() {
    let ctx = create_test_context();
    seed_kitkat_store(&ctx);
    ctx.store.seed_inventory(inventory("inv-kitkat", "KitKat", 2.0));

    for tx in ["tx-1", "tx-2", "tx-3"] {
        ctx.state
            .orchestrator
            .process_sale(&sale(tx, vec![sale_line("KitKat Croffle", 1)]))
            .await;
    }

    // Third sale finds zero KitKat stock and records an error instead of
    // forcing a negative write.
    assert_eq!(stock_of(&ctx, "inv-kitkat").await, 0.0);
    assert_eq!(stock_of(&ctx, "inv-croissant").await, 47.0);
}

#[tokio::test]
async fn test_unmapped_ingredient_falls_back_to_name_matching() {
    let ctx = create_test_context();
    seed_kitkat_store(&ctx);
    // Break the KitKat mapping; the name still matches inventory exactly.
    ctx.store.seed_recipe(
        recipe("rec-kitkat", Some("tpl-kitkat"), "KitKat Croffle"),
        vec![recipe_ingredient("ri-2", "rec-kitkat", "KitKat", 1.0, None)],
    );

    let result = ctx
        .state
        .orchestrator
        .process_sale(&sale("tx-1", vec![sale_line("KitKat Croffle", 1)]))
        .await;

    assert_eq!(result.status, DeductionStatus::Completed);
    assert_eq!(stock_of(&ctx, "inv-kitkat").await, 19.0);
}

#[tokio::test]
async fn test_unmatchable_ingredient_is_skipped_not_fatal() {
    let ctx = create_test_context();
    seed_kitkat_store(&ctx);
    ctx.store.seed_recipe(
        recipe("rec-kitkat", Some("tpl-kitkat"), "KitKat Croffle"),
        vec![
            recipe_ingredient("ri-1", "rec-kitkat", "Regular Croissant", 1.0, Some("inv-croissant")),
            recipe_ingredient("ri-2", "rec-kitkat", "Imported Gold Leaf", 1.0, None),
        ],
    );

    let result = ctx
        .state
        .orchestrator
        .process_sale(&sale("tx-1", vec![sale_line("KitKat Croffle", 1)]))
        .await;

    // No match for the exotic ingredient: skipped, everything else deducted.
    assert_eq!(result.status, DeductionStatus::Completed);
    assert_eq!(result.skipped_count, 1);
    assert_eq!(stock_of(&ctx, "inv-croissant").await, 49.0);
}

#[tokio::test]
async fn test_composite_sale_deducts_selected_choices_only() {
    let ctx = create_test_context();
    seed_kitkat_store(&ctx);
    seed_mini_croffle(&ctx);

    let result = ctx
        .state
        .orchestrator
        .process_sale(&sale(
            "tx-1",
            vec![sale_line("Mini Croffle with Choco Flakes and Chocolate Sauce", 1)],
        ))
        .await;

    assert_eq!(result.status, DeductionStatus::Completed);
    // Base and packaging at full quantity.
    assert_eq!(stock_of(&ctx, "inv-croissant").await, 49.5);
    assert_eq!(stock_of(&ctx, "inv-box").await, 99.0);
    assert_eq!(stock_of(&ctx, "inv-stick").await, 199.0);
    // Selected choices at the 0.5 portion.
    assert_eq!(stock_of(&ctx, "inv-flakes").await, 39.5);
    assert_eq!(stock_of(&ctx, "inv-sauce").await, 24.5);
    // Marshmallow was not selected.
    assert_eq!(stock_of(&ctx, "inv-marsh").await, 35.0);
}

#[tokio::test]
async fn test_composite_unknown_choice_ignored() {
    let ctx = create_test_context();
    seed_kitkat_store(&ctx);
    seed_mini_croffle(&ctx);

    let result = ctx
        .state
        .orchestrator
        .process_sale(&sale(
            "tx-1",
            vec![sale_line("Mini Croffle with Bacon Bits", 1)],
        ))
        .await;

    // Unknown choice deducts nothing extra and does not fail the parse.
    assert_eq!(result.status, DeductionStatus::Completed);
    assert_eq!(stock_of(&ctx, "inv-croissant").await, 49.5);
    assert_eq!(stock_of(&ctx, "inv-flakes").await, 40.0);
    assert_eq!(stock_of(&ctx, "inv-sauce").await, 25.0);
}

#[tokio::test]
async fn test_template_fallback_deducts_via_matcher() {
    let ctx = create_test_context();
    seed_kitkat_store(&ctx);
    // Catalog entry with a broken recipe link; the template still matches
    // the product name and inventory names line up.
    ctx.store
        .seed_catalog_entry(catalog_entry("cat-kitkat", "KitKat Croffle", None));

    let result = ctx
        .state
        .orchestrator
        .process_sale(&sale("tx-1", vec![sale_line("KitKat Croffle", 1)]))
        .await;

    assert_eq!(result.status, DeductionStatus::Completed);
    assert_eq!(stock_of(&ctx, "inv-croissant").await, 49.0);
    assert_eq!(stock_of(&ctx, "inv-kitkat").await, 19.0);
    assert_eq!(stock_of(&ctx, "inv-cream").await, 29.0);
}

#[tokio::test]
async fn test_unresolvable_product_fails_line() {
    let ctx = create_test_context();
    seed_kitkat_store(&ctx);

    let result = ctx
        .state
        .orchestrator
        .process_sale(&sale("tx-1", vec![sale_line("Ube Croffle", 1)]))
        .await;

    assert_eq!(result.status, DeductionStatus::Failed);
    assert_eq!(result.deducted_count, 0);
    assert!(result.errors[0].contains("no catalog entry"));
}

#[tokio::test]
async fn test_movement_rows_reference_transaction() {
    let ctx = create_test_context();
    seed_kitkat_store(&ctx);

    ctx.state
        .orchestrator
        .process_sale(&sale("tx-42", vec![sale_line("KitKat Croffle", 1)]))
        .await;

    let movements = ctx.store.movements_for_reference("tx-42").await.unwrap();
    assert_eq!(movements.len(), 3);
    for m in &movements {
        assert_eq!(m.movement_type, MovementType::Deduction);
        assert_eq!(m.reference_id, "tx-42");
        assert_eq!(m.new_quantity, m.previous_quantity + m.quantity_delta);
        assert!(m.quantity_delta < 0.0);
    }
}
