//! Deduction scenario tests
//!
//! Driven end-to-end against the in-memory store: seed a croffle store,
//! run sales through the orchestrator, and assert on stock, movements, and
//! terminal states.

mod test_engine;
mod test_orchestrator;
mod test_reconcile;

use std::sync::Arc;

use rust_decimal::Decimal;
use shared::models::{
    DeductionStatus, InventoryItem, ProductCatalogEntry, Recipe, RecipeIngredient, RecipeTemplate,
    SaleTransaction, Store, TemplateIngredient, TransactionItem,
};
use shared::request::{SaleInput, SaleLineInput};

use crate::core::{Config, EnginePolicy, ServerState};
use crate::store::MemoryStore;

pub const STORE_ID: &str = "store-1";

pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub state: ServerState,
}

pub fn test_config() -> Config {
    Config {
        http_port: 0,
        environment: "test".to_string(),
        backend_url: None,
        backend_api_key: String::new(),
        log_dir: None,
        policy: EnginePolicy::default(),
    }
}

pub fn create_test_context() -> TestContext {
    create_test_context_with(test_config())
}

pub fn create_test_context_with(config: Config) -> TestContext {
    let store = Arc::new(MemoryStore::new());
    let state = ServerState::with_store(config, store.clone());
    TestContext { store, state }
}

// ========== Model builders ==========

pub fn inventory(id: &str, name: &str, qty: f64) -> InventoryItem {
    InventoryItem {
        id: id.to_string(),
        store_id: STORE_ID.to_string(),
        item: name.to_string(),
        unit: "pieces".to_string(),
        stock_quantity: qty,
        minimum_threshold: 0.0,
        is_active: true,
    }
}

pub fn template(id: &str, name: &str, category: &str) -> RecipeTemplate {
    RecipeTemplate {
        id: id.to_string(),
        name: name.to_string(),
        category: category.to_string(),
        yield_quantity: 1.0,
        serving_size: None,
        suggested_price: None,
        is_active: true,
        version: 1,
    }
}

pub fn template_ingredient(id: &str, template_id: &str, name: &str, qty: f64) -> TemplateIngredient {
    TemplateIngredient {
        id: id.to_string(),
        template_id: template_id.to_string(),
        ingredient_name: name.to_string(),
        quantity: qty,
        unit: "pieces".to_string(),
        cost_per_unit: None,
    }
}

pub fn recipe(id: &str, template_id: Option<&str>, name: &str) -> Recipe {
    Recipe {
        id: id.to_string(),
        store_id: STORE_ID.to_string(),
        template_id: template_id.map(str::to_string),
        name: name.to_string(),
        is_active: true,
        suggested_price: None,
    }
}

pub fn recipe_ingredient(
    id: &str,
    recipe_id: &str,
    name: &str,
    qty: f64,
    mapping: Option<&str>,
) -> RecipeIngredient {
    RecipeIngredient {
        id: id.to_string(),
        recipe_id: recipe_id.to_string(),
        ingredient_name: name.to_string(),
        quantity: qty,
        unit: "pieces".to_string(),
        inventory_stock_id: mapping.map(str::to_string),
    }
}

pub fn catalog_entry(id: &str, name: &str, recipe_id: Option<&str>) -> ProductCatalogEntry {
    ProductCatalogEntry {
        id: id.to_string(),
        store_id: STORE_ID.to_string(),
        product_name: name.to_string(),
        price: Decimal::from(125),
        is_available: true,
        recipe_id: recipe_id.map(str::to_string),
    }
}

pub fn sale(transaction_id: &str, items: Vec<SaleLineInput>) -> SaleInput {
    SaleInput {
        transaction_id: transaction_id.to_string(),
        store_id: STORE_ID.to_string(),
        items,
    }
}

pub fn sale_line(name: &str, quantity: u32) -> SaleLineInput {
    SaleLineInput {
        product_id: None,
        name: name.to_string(),
        quantity,
        unit_price: 125.0,
    }
}

pub fn transaction_item(name: &str, quantity: u32) -> TransactionItem {
    TransactionItem {
        product_id: None,
        name: name.to_string(),
        quantity,
        unit_price: Decimal::from(125),
    }
}

pub fn stored_transaction(id: &str, items: Vec<TransactionItem>) -> SaleTransaction {
    SaleTransaction {
        id: id.to_string(),
        store_id: STORE_ID.to_string(),
        total: items
            .iter()
            .map(|i| i.unit_price * Decimal::from(i.quantity))
            .sum(),
        created_at: chrono::Utc::now(),
        items,
        deduction_status: DeductionStatus::Pending,
    }
}

// ========== Store fixtures ==========

/// The default store: one seeded store row plus the KitKat Croffle recipe
/// chain (template → recipe → mapped ingredients → catalog entry).
///
/// Stock: Regular Croissant 50, KitKat 20, Whipped Cream 30.
pub fn seed_kitkat_store(ctx: &TestContext) {
    ctx.store.seed_store(Store {
        id: STORE_ID.to_string(),
        name: "SM Croffle Corner".to_string(),
        is_active: true,
    });

    ctx.store.seed_inventory(inventory("inv-croissant", "Regular Croissant", 50.0));
    ctx.store.seed_inventory(inventory("inv-kitkat", "KitKat", 20.0));
    ctx.store.seed_inventory(inventory("inv-cream", "Whipped Cream", 30.0));

    ctx.store.seed_template(
        template("tpl-kitkat", "KitKat Croffle", "classic"),
        vec![
            template_ingredient("ti-1", "tpl-kitkat", "Regular Croissant", 1.0),
            template_ingredient("ti-2", "tpl-kitkat", "KitKat", 1.0),
            template_ingredient("ti-3", "tpl-kitkat", "Whipped Cream", 1.0),
        ],
    );
    ctx.store.seed_recipe(
        recipe("rec-kitkat", Some("tpl-kitkat"), "KitKat Croffle"),
        vec![
            recipe_ingredient("ri-1", "rec-kitkat", "Regular Croissant", 1.0, Some("inv-croissant")),
            recipe_ingredient("ri-2", "rec-kitkat", "KitKat", 1.0, Some("inv-kitkat")),
            recipe_ingredient("ri-3", "rec-kitkat", "Whipped Cream", 1.0, Some("inv-cream")),
        ],
    );
    ctx.store
        .seed_catalog_entry(catalog_entry("cat-kitkat", "KitKat Croffle", Some("rec-kitkat")));
}

/// Adds the composite Mini Croffle chain on top of the KitKat fixture.
///
/// Choice vocabulary (mini_croffle, portion 0.5): Choco Flakes, Chocolate
/// Sauce, Marshmallow, … Packaging: Mini Take-Out Box, Popsicle Stick.
pub fn seed_mini_croffle(ctx: &TestContext) {
    ctx.store.seed_inventory(inventory("inv-flakes", "Choco Flakes", 40.0));
    ctx.store.seed_inventory(inventory("inv-sauce", "Chocolate Sauce", 25.0));
    ctx.store.seed_inventory(inventory("inv-marsh", "Marshmallow", 35.0));
    ctx.store.seed_inventory(inventory("inv-box", "Mini Take-Out Box", 100.0));
    ctx.store.seed_inventory(inventory("inv-stick", "Popsicle Stick", 200.0));

    ctx.store.seed_template(
        template("tpl-mini", "Mini Croffle", "mini_croffle"),
        vec![
            template_ingredient("mi-1", "tpl-mini", "Regular Croissant", 0.5),
            template_ingredient("mi-2", "tpl-mini", "Choco Flakes", 1.0),
            template_ingredient("mi-3", "tpl-mini", "Chocolate Sauce", 1.0),
            template_ingredient("mi-4", "tpl-mini", "Marshmallow", 1.0),
            template_ingredient("mi-5", "tpl-mini", "Mini Take-Out Box", 1.0),
            template_ingredient("mi-6", "tpl-mini", "Popsicle Stick", 1.0),
        ],
    );
    ctx.store.seed_recipe(
        recipe("rec-mini", Some("tpl-mini"), "Mini Croffle"),
        vec![
            recipe_ingredient("mr-1", "rec-mini", "Regular Croissant", 0.5, Some("inv-croissant")),
            recipe_ingredient("mr-2", "rec-mini", "Choco Flakes", 1.0, Some("inv-flakes")),
            recipe_ingredient("mr-3", "rec-mini", "Chocolate Sauce", 1.0, Some("inv-sauce")),
            recipe_ingredient("mr-4", "rec-mini", "Marshmallow", 1.0, Some("inv-marsh")),
            recipe_ingredient("mr-5", "rec-mini", "Mini Take-Out Box", 1.0, Some("inv-box")),
            recipe_ingredient("mr-6", "rec-mini", "Popsicle Stick", 1.0, Some("inv-stick")),
        ],
    );
    ctx.store
        .seed_catalog_entry(catalog_entry("cat-mini", "Mini Croffle", Some("rec-mini")));
}

pub async fn stock_of(ctx: &TestContext, id: &str) -> f64 {
    use crate::store::Datastore;
    ctx.store
        .inventory_by_id(id)
        .await
        .unwrap()
        .unwrap()
        .stock_quantity
}
