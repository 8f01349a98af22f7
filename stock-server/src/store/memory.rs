//! In-Memory Store
//!
//! DashMap-backed implementation of [`Datastore`] used by tests and local
//! development (`BACKEND_URL` unset). List results are ordered by row id so
//! repeated runs stay reproducible.

use async_trait::async_trait;
use dashmap::DashMap;
use shared::models::{
    DeductionStatus, InventoryItem, InventoryMovement, MovementType, ProductCatalogEntry, Recipe,
    RecipeIngredient, RecipeTemplate, SaleTransaction, Store, TemplateIngredient,
};
use shared::normalize_name;

use super::{Datastore, StoreError, StoreResult};

/// In-memory table set.
#[derive(Debug, Default)]
pub struct MemoryStore {
    stores: DashMap<String, Store>,
    catalog: DashMap<String, ProductCatalogEntry>,
    recipes: DashMap<String, Recipe>,
    recipe_ingredients: DashMap<String, RecipeIngredient>,
    templates: DashMap<String, RecipeTemplate>,
    template_ingredients: DashMap<String, TemplateIngredient>,
    inventory: DashMap<String, InventoryItem>,
    movements: DashMap<String, InventoryMovement>,
    transactions: DashMap<String, SaleTransaction>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ========== Seeding (tests / dev fixtures) ==========

    pub fn seed_store(&self, store: Store) {
        self.stores.insert(store.id.clone(), store);
    }

    pub fn seed_inventory(&self, item: InventoryItem) {
        self.inventory.insert(item.id.clone(), item);
    }

    pub fn seed_catalog_entry(&self, entry: ProductCatalogEntry) {
        self.catalog.insert(entry.id.clone(), entry);
    }

    pub fn seed_recipe(&self, recipe: Recipe, ingredients: Vec<RecipeIngredient>) {
        self.recipes.insert(recipe.id.clone(), recipe);
        for row in ingredients {
            self.recipe_ingredients.insert(row.id.clone(), row);
        }
    }

    pub fn seed_template(&self, template: RecipeTemplate, ingredients: Vec<TemplateIngredient>) {
        self.templates.insert(template.id.clone(), template);
        for row in ingredients {
            self.template_ingredients.insert(row.id.clone(), row);
        }
    }

    pub fn seed_transaction(&self, transaction: SaleTransaction) {
        self.transactions.insert(transaction.id.clone(), transaction);
    }

    /// Movement count across all tables (test observability).
    pub fn movement_count(&self) -> usize {
        self.movements.len()
    }

    fn sorted_by_id<T, F>(&self, rows: Vec<T>, id_of: F) -> Vec<T>
    where
        F: Fn(&T) -> String,
    {
        let mut rows = rows;
        rows.sort_by_key(|r| id_of(r));
        rows
    }
}

#[async_trait]
impl Datastore for MemoryStore {
    // ========== Stores ==========

    async fn list_stores(&self) -> StoreResult<Vec<Store>> {
        let rows: Vec<Store> = self.stores.iter().map(|e| e.value().clone()).collect();
        Ok(self.sorted_by_id(rows, |s| s.id.clone()))
    }

    // ========== Product catalog ==========

    async fn catalog_entry_by_id(&self, id: &str) -> StoreResult<Option<ProductCatalogEntry>> {
        Ok(self.catalog.get(id).map(|e| e.value().clone()))
    }

    async fn catalog_entry_by_name(
        &self,
        store_id: &str,
        normalized_name: &str,
    ) -> StoreResult<Option<ProductCatalogEntry>> {
        let mut rows: Vec<ProductCatalogEntry> = self
            .catalog
            .iter()
            .filter(|e| {
                e.value().store_id == store_id
                    && normalize_name(&e.value().product_name) == normalized_name
            })
            .map(|e| e.value().clone())
            .collect();
        rows.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(rows.into_iter().next())
    }

    async fn catalog_entries_by_store(
        &self,
        store_id: &str,
    ) -> StoreResult<Vec<ProductCatalogEntry>> {
        let rows: Vec<ProductCatalogEntry> = self
            .catalog
            .iter()
            .filter(|e| e.value().store_id == store_id)
            .map(|e| e.value().clone())
            .collect();
        Ok(self.sorted_by_id(rows, |e| e.id.clone()))
    }

    async fn set_catalog_recipe(
        &self,
        entry_id: &str,
        recipe_id: &str,
    ) -> StoreResult<ProductCatalogEntry> {
        let mut entry = self
            .catalog
            .get_mut(entry_id)
            .ok_or_else(|| StoreError::NotFound(format!("catalog entry {entry_id}")))?;
        entry.recipe_id = Some(recipe_id.to_string());
        Ok(entry.value().clone())
    }

    // ========== Recipes ==========

    async fn recipe_by_id(&self, id: &str) -> StoreResult<Option<Recipe>> {
        Ok(self.recipes.get(id).map(|e| e.value().clone()))
    }

    async fn recipes_by_store(&self, store_id: &str) -> StoreResult<Vec<Recipe>> {
        let rows: Vec<Recipe> = self
            .recipes
            .iter()
            .filter(|e| e.value().store_id == store_id)
            .map(|e| e.value().clone())
            .collect();
        Ok(self.sorted_by_id(rows, |r| r.id.clone()))
    }

    async fn recipe_ingredients(&self, recipe_id: &str) -> StoreResult<Vec<RecipeIngredient>> {
        let rows: Vec<RecipeIngredient> = self
            .recipe_ingredients
            .iter()
            .filter(|e| e.value().recipe_id == recipe_id)
            .map(|e| e.value().clone())
            .collect();
        Ok(self.sorted_by_id(rows, |r| r.id.clone()))
    }

    async fn set_ingredient_mapping(
        &self,
        ingredient_id: &str,
        inventory_stock_id: &str,
    ) -> StoreResult<RecipeIngredient> {
        let mut row = self
            .recipe_ingredients
            .get_mut(ingredient_id)
            .ok_or_else(|| StoreError::NotFound(format!("recipe ingredient {ingredient_id}")))?;
        row.inventory_stock_id = Some(inventory_stock_id.to_string());
        Ok(row.value().clone())
    }

    // ========== Recipe templates ==========

    async fn template_by_id(&self, id: &str) -> StoreResult<Option<RecipeTemplate>> {
        Ok(self.templates.get(id).map(|e| e.value().clone()))
    }

    async fn template_by_name(
        &self,
        normalized_name: &str,
    ) -> StoreResult<Option<RecipeTemplate>> {
        let mut rows: Vec<RecipeTemplate> = self
            .templates
            .iter()
            .filter(|e| normalize_name(&e.value().name) == normalized_name)
            .map(|e| e.value().clone())
            .collect();
        rows.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(rows.into_iter().next())
    }

    async fn template_ingredients(
        &self,
        template_id: &str,
    ) -> StoreResult<Vec<TemplateIngredient>> {
        let rows: Vec<TemplateIngredient> = self
            .template_ingredients
            .iter()
            .filter(|e| e.value().template_id == template_id)
            .map(|e| e.value().clone())
            .collect();
        Ok(self.sorted_by_id(rows, |r| r.id.clone()))
    }

    // ========== Inventory ==========

    async fn inventory_by_id(&self, id: &str) -> StoreResult<Option<InventoryItem>> {
        Ok(self.inventory.get(id).map(|e| e.value().clone()))
    }

    async fn inventory_by_store(&self, store_id: &str) -> StoreResult<Vec<InventoryItem>> {
        let rows: Vec<InventoryItem> = self
            .inventory
            .iter()
            .filter(|e| e.value().store_id == store_id)
            .map(|e| e.value().clone())
            .collect();
        Ok(self.sorted_by_id(rows, |i| i.id.clone()))
    }

    async fn update_stock(&self, id: &str, new_quantity: f64) -> StoreResult<InventoryItem> {
        if new_quantity < 0.0 {
            return Err(StoreError::Validation(format!(
                "stock_quantity must not be negative (got {new_quantity})"
            )));
        }
        let mut item = self
            .inventory
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(format!("inventory item {id}")))?;
        item.stock_quantity = new_quantity;
        Ok(item.value().clone())
    }

    // ========== Inventory movements ==========

    async fn insert_movement(
        &self,
        mut movement: InventoryMovement,
    ) -> StoreResult<InventoryMovement> {
        let id = movement
            .id
            .clone()
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        movement.id = Some(id.clone());
        self.movements.insert(id, movement.clone());
        Ok(movement)
    }

    async fn movement_exists(
        &self,
        inventory_stock_id: &str,
        reference_id: &str,
        types: &[MovementType],
    ) -> StoreResult<bool> {
        Ok(self.movements.iter().any(|e| {
            let m = e.value();
            m.inventory_stock_id == inventory_stock_id
                && m.reference_id == reference_id
                && types.contains(&m.movement_type)
        }))
    }

    async fn movements_for_reference(
        &self,
        reference_id: &str,
    ) -> StoreResult<Vec<InventoryMovement>> {
        let mut rows: Vec<InventoryMovement> = self
            .movements
            .iter()
            .filter(|e| e.value().reference_id == reference_id)
            .map(|e| e.value().clone())
            .collect();
        rows.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(rows)
    }

    async fn movements_for_item(
        &self,
        inventory_stock_id: &str,
    ) -> StoreResult<Vec<InventoryMovement>> {
        let mut rows: Vec<InventoryMovement> = self
            .movements
            .iter()
            .filter(|e| e.value().inventory_stock_id == inventory_stock_id)
            .map(|e| e.value().clone())
            .collect();
        rows.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(rows)
    }

    // ========== Transactions ==========

    async fn transaction_by_id(&self, id: &str) -> StoreResult<Option<SaleTransaction>> {
        Ok(self.transactions.get(id).map(|e| e.value().clone()))
    }

    async fn upsert_transaction(&self, transaction: SaleTransaction) -> StoreResult<()> {
        self.transactions
            .insert(transaction.id.clone(), transaction);
        Ok(())
    }

    async fn set_deduction_status(
        &self,
        transaction_id: &str,
        status: DeductionStatus,
    ) -> StoreResult<()> {
        let mut tx = self
            .transactions
            .get_mut(transaction_id)
            .ok_or_else(|| StoreError::NotFound(format!("transaction {transaction_id}")))?;
        tx.deduction_status = status;
        Ok(())
    }

    async fn transactions_by_status(
        &self,
        statuses: &[DeductionStatus],
    ) -> StoreResult<Vec<SaleTransaction>> {
        let rows: Vec<SaleTransaction> = self
            .transactions
            .iter()
            .filter(|e| statuses.contains(&e.value().deduction_status))
            .map(|e| e.value().clone())
            .collect();
        Ok(self.sorted_by_id(rows, |t| t.id.clone()))
    }
}
