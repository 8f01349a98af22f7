//! Persistence Boundary
//!
//! The hosted relational backend is an external collaborator; this module
//! defines the contract the engine needs from it (point lookup by id,
//! filtered list by store id, insert/update with returned row) and two
//! implementations:
//!
//! - [`RestStore`]: speaks to the hosted table API over HTTP
//! - [`MemoryStore`]: in-memory tables for tests and local development
//!
//! Only the deduction engine and the reconcile service mutate
//! `stock_quantity`, always via [`Datastore::update_stock`] paired with an
//! [`InventoryMovement`] row.

pub mod memory;
pub mod rest;

pub use memory::MemoryStore;
pub use rest::{ApiContext, RestStore};

use async_trait::async_trait;
use shared::models::{
    DeductionStatus, InventoryItem, InventoryMovement, MovementType, ProductCatalogEntry, Recipe,
    RecipeIngredient, RecipeTemplate, SaleTransaction, Store, TemplateIngredient,
};
use thiserror::Error;

/// Store error types
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        StoreError::Backend(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Contract with the hosted table backend.
///
/// Name lookups take pre-normalized names (see [`shared::normalize_name`]);
/// implementations normalize their side before comparing.
#[async_trait]
pub trait Datastore: Send + Sync {
    // ========== Stores ==========
    async fn list_stores(&self) -> StoreResult<Vec<Store>>;

    // ========== Product catalog ==========
    async fn catalog_entry_by_id(&self, id: &str) -> StoreResult<Option<ProductCatalogEntry>>;
    async fn catalog_entry_by_name(
        &self,
        store_id: &str,
        normalized_name: &str,
    ) -> StoreResult<Option<ProductCatalogEntry>>;
    async fn catalog_entries_by_store(&self, store_id: &str)
    -> StoreResult<Vec<ProductCatalogEntry>>;
    /// Link a catalog entry to a recipe, returning the updated row.
    async fn set_catalog_recipe(
        &self,
        entry_id: &str,
        recipe_id: &str,
    ) -> StoreResult<ProductCatalogEntry>;

    // ========== Recipes ==========
    async fn recipe_by_id(&self, id: &str) -> StoreResult<Option<Recipe>>;
    async fn recipes_by_store(&self, store_id: &str) -> StoreResult<Vec<Recipe>>;
    async fn recipe_ingredients(&self, recipe_id: &str) -> StoreResult<Vec<RecipeIngredient>>;
    /// Map a recipe ingredient to an inventory item, returning the updated row.
    async fn set_ingredient_mapping(
        &self,
        ingredient_id: &str,
        inventory_stock_id: &str,
    ) -> StoreResult<RecipeIngredient>;

    // ========== Recipe templates ==========
    async fn template_by_id(&self, id: &str) -> StoreResult<Option<RecipeTemplate>>;
    async fn template_by_name(&self, normalized_name: &str)
    -> StoreResult<Option<RecipeTemplate>>;
    async fn template_ingredients(&self, template_id: &str)
    -> StoreResult<Vec<TemplateIngredient>>;

    // ========== Inventory ==========
    async fn inventory_by_id(&self, id: &str) -> StoreResult<Option<InventoryItem>>;
    async fn inventory_by_store(&self, store_id: &str) -> StoreResult<Vec<InventoryItem>>;
    /// Persist a new stock quantity, returning the updated row. Callers must
    /// pair every call with an inserted movement row.
    async fn update_stock(&self, id: &str, new_quantity: f64) -> StoreResult<InventoryItem>;

    // ========== Inventory movements ==========
    async fn insert_movement(&self, movement: InventoryMovement)
    -> StoreResult<InventoryMovement>;
    /// Idempotence probe: does a movement of one of `types` already exist for
    /// this (inventory item, reference) pair?
    async fn movement_exists(
        &self,
        inventory_stock_id: &str,
        reference_id: &str,
        types: &[MovementType],
    ) -> StoreResult<bool>;
    async fn movements_for_reference(
        &self,
        reference_id: &str,
    ) -> StoreResult<Vec<InventoryMovement>>;
    async fn movements_for_item(
        &self,
        inventory_stock_id: &str,
    ) -> StoreResult<Vec<InventoryMovement>>;

    // ========== Transactions ==========
    async fn transaction_by_id(&self, id: &str) -> StoreResult<Option<SaleTransaction>>;
    async fn upsert_transaction(&self, transaction: SaleTransaction) -> StoreResult<()>;
    async fn set_deduction_status(
        &self,
        transaction_id: &str,
        status: DeductionStatus,
    ) -> StoreResult<()>;
    async fn transactions_by_status(
        &self,
        statuses: &[DeductionStatus],
    ) -> StoreResult<Vec<SaleTransaction>>;
}
