//! REST Store
//!
//! [`Datastore`] implementation over the hosted table API. Each table is
//! exposed as `{base_url}/rest/v1/{table}` with filter query params
//! (`column=eq.value`), `order=id`, and `Prefer: return=representation` on
//! writes.
//!
//! Credentials live in an immutable [`ApiContext`] captured at construction;
//! headers are built per request. No shared mutable header state.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use shared::models::{
    DeductionStatus, InventoryItem, InventoryMovement, MovementType, ProductCatalogEntry, Recipe,
    RecipeIngredient, RecipeTemplate, SaleTransaction, Store, TemplateIngredient,
};
use tracing::warn;

use super::{Datastore, StoreError, StoreResult};

/// Immutable request credentials for the hosted table API.
#[derive(Debug, Clone)]
pub struct ApiContext {
    pub api_key: String,
}

impl ApiContext {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
        }
    }
}

/// HTTP client for the hosted backend.
#[derive(Clone)]
pub struct RestStore {
    client: reqwest::Client,
    base_url: String,
    context: ApiContext,
}

impl RestStore {
    pub fn new(base_url: impl Into<String>, context: ApiContext) -> Self {
        let base_url = base_url.into();
        let base_url = base_url.trim_end_matches('/').to_string();
        Self {
            client: reqwest::Client::new(),
            base_url,
            context,
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Ok(value) = HeaderValue::from_str(&self.context.api_key) {
            headers.insert("apikey", value);
        }
        if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", self.context.api_key)) {
            headers.insert(reqwest::header::AUTHORIZATION, value);
        }
        headers
    }

    /// GET rows matching the given filters.
    async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        filters: &[(&str, String)],
    ) -> StoreResult<Vec<T>> {
        let mut query: Vec<(String, String)> = vec![
            ("select".into(), "*".into()),
            ("order".into(), "id".into()),
        ];
        for (column, value) in filters {
            query.push(((*column).to_string(), format!("eq.{value}")));
        }

        let resp = self
            .client
            .get(self.table_url(table))
            .headers(self.headers())
            .query(&query)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(StoreError::Backend(format!(
                "GET {table} failed: {status} - {text}"
            )));
        }

        Ok(resp.json().await?)
    }

    async fn select_one<T: DeserializeOwned>(
        &self,
        table: &str,
        filters: &[(&str, String)],
    ) -> StoreResult<Option<T>> {
        let mut rows: Vec<T> = self.select(table, filters).await?;
        if rows.len() > 1 {
            warn!(table, "expected at most one row, got {}", rows.len());
        }
        Ok(if rows.is_empty() {
            None
        } else {
            Some(rows.remove(0))
        })
    }

    /// PATCH rows matching `filters`, returning the updated representation.
    async fn update_returning<T: DeserializeOwned, B: Serialize>(
        &self,
        table: &str,
        filters: &[(&str, String)],
        body: &B,
    ) -> StoreResult<T> {
        let query: Vec<(String, String)> = filters
            .iter()
            .map(|(column, value)| ((*column).to_string(), format!("eq.{value}")))
            .collect();

        let resp = self
            .client
            .patch(self.table_url(table))
            .headers(self.headers())
            .header("Prefer", "return=representation")
            .query(&query)
            .json(body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(StoreError::Backend(format!(
                "PATCH {table} failed: {status} - {text}"
            )));
        }

        let mut rows: Vec<T> = resp.json().await?;
        if rows.is_empty() {
            return Err(StoreError::NotFound(format!(
                "{table} row matching {filters:?}"
            )));
        }
        Ok(rows.remove(0))
    }

    /// POST one row, returning the inserted representation.
    async fn insert_returning<T: DeserializeOwned, B: Serialize>(
        &self,
        table: &str,
        body: &B,
    ) -> StoreResult<T> {
        let resp = self
            .client
            .post(self.table_url(table))
            .headers(self.headers())
            .header("Prefer", "return=representation")
            .json(body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(StoreError::Backend(format!(
                "POST {table} failed: {status} - {text}"
            )));
        }

        let mut rows: Vec<T> = resp.json().await?;
        if rows.is_empty() {
            return Err(StoreError::Backend(format!(
                "POST {table} returned no representation"
            )));
        }
        Ok(rows.remove(0))
    }
}

impl std::fmt::Debug for RestStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestStore")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[async_trait]
impl Datastore for RestStore {
    // ========== Stores ==========

    async fn list_stores(&self) -> StoreResult<Vec<Store>> {
        self.select("stores", &[]).await
    }

    // ========== Product catalog ==========

    async fn catalog_entry_by_id(&self, id: &str) -> StoreResult<Option<ProductCatalogEntry>> {
        self.select_one("product_catalog", &[("id", id.to_string())])
            .await
    }

    async fn catalog_entry_by_name(
        &self,
        store_id: &str,
        normalized_name: &str,
    ) -> StoreResult<Option<ProductCatalogEntry>> {
        // The backend stores display-cased names; filter by store and compare
        // normalized on this side.
        let rows: Vec<ProductCatalogEntry> = self
            .select("product_catalog", &[("store_id", store_id.to_string())])
            .await?;
        Ok(rows
            .into_iter()
            .find(|e| shared::normalize_name(&e.product_name) == normalized_name))
    }

    async fn catalog_entries_by_store(
        &self,
        store_id: &str,
    ) -> StoreResult<Vec<ProductCatalogEntry>> {
        self.select("product_catalog", &[("store_id", store_id.to_string())])
            .await
    }

    async fn set_catalog_recipe(
        &self,
        entry_id: &str,
        recipe_id: &str,
    ) -> StoreResult<ProductCatalogEntry> {
        self.update_returning(
            "product_catalog",
            &[("id", entry_id.to_string())],
            &json!({ "recipe_id": recipe_id }),
        )
        .await
    }

    // ========== Recipes ==========

    async fn recipe_by_id(&self, id: &str) -> StoreResult<Option<Recipe>> {
        self.select_one("recipes", &[("id", id.to_string())]).await
    }

    async fn recipes_by_store(&self, store_id: &str) -> StoreResult<Vec<Recipe>> {
        self.select("recipes", &[("store_id", store_id.to_string())])
            .await
    }

    async fn recipe_ingredients(&self, recipe_id: &str) -> StoreResult<Vec<RecipeIngredient>> {
        self.select("recipe_ingredients", &[("recipe_id", recipe_id.to_string())])
            .await
    }

    async fn set_ingredient_mapping(
        &self,
        ingredient_id: &str,
        inventory_stock_id: &str,
    ) -> StoreResult<RecipeIngredient> {
        self.update_returning(
            "recipe_ingredients",
            &[("id", ingredient_id.to_string())],
            &json!({ "inventory_stock_id": inventory_stock_id }),
        )
        .await
    }

    // ========== Recipe templates ==========

    async fn template_by_id(&self, id: &str) -> StoreResult<Option<RecipeTemplate>> {
        self.select_one("recipe_templates", &[("id", id.to_string())])
            .await
    }

    async fn template_by_name(
        &self,
        normalized_name: &str,
    ) -> StoreResult<Option<RecipeTemplate>> {
        let rows: Vec<RecipeTemplate> = self.select("recipe_templates", &[]).await?;
        Ok(rows
            .into_iter()
            .find(|t| shared::normalize_name(&t.name) == normalized_name))
    }

    async fn template_ingredients(
        &self,
        template_id: &str,
    ) -> StoreResult<Vec<TemplateIngredient>> {
        self.select(
            "recipe_template_ingredients",
            &[("template_id", template_id.to_string())],
        )
        .await
    }

    // ========== Inventory ==========

    async fn inventory_by_id(&self, id: &str) -> StoreResult<Option<InventoryItem>> {
        self.select_one("inventory_stock", &[("id", id.to_string())])
            .await
    }

    async fn inventory_by_store(&self, store_id: &str) -> StoreResult<Vec<InventoryItem>> {
        self.select("inventory_stock", &[("store_id", store_id.to_string())])
            .await
    }

    async fn update_stock(&self, id: &str, new_quantity: f64) -> StoreResult<InventoryItem> {
        if new_quantity < 0.0 {
            return Err(StoreError::Validation(format!(
                "stock_quantity must not be negative (got {new_quantity})"
            )));
        }
        self.update_returning(
            "inventory_stock",
            &[("id", id.to_string())],
            &json!({ "stock_quantity": new_quantity }),
        )
        .await
    }

    // ========== Inventory movements ==========

    async fn insert_movement(
        &self,
        movement: InventoryMovement,
    ) -> StoreResult<InventoryMovement> {
        self.insert_returning("inventory_movements", &movement).await
    }

    async fn movement_exists(
        &self,
        inventory_stock_id: &str,
        reference_id: &str,
        types: &[MovementType],
    ) -> StoreResult<bool> {
        let rows: Vec<InventoryMovement> = self
            .select(
                "inventory_movements",
                &[
                    ("inventory_stock_id", inventory_stock_id.to_string()),
                    ("reference_id", reference_id.to_string()),
                ],
            )
            .await?;
        Ok(rows.iter().any(|m| types.contains(&m.movement_type)))
    }

    async fn movements_for_reference(
        &self,
        reference_id: &str,
    ) -> StoreResult<Vec<InventoryMovement>> {
        self.select(
            "inventory_movements",
            &[("reference_id", reference_id.to_string())],
        )
        .await
    }

    async fn movements_for_item(
        &self,
        inventory_stock_id: &str,
    ) -> StoreResult<Vec<InventoryMovement>> {
        self.select(
            "inventory_movements",
            &[("inventory_stock_id", inventory_stock_id.to_string())],
        )
        .await
    }

    // ========== Transactions ==========

    async fn transaction_by_id(&self, id: &str) -> StoreResult<Option<SaleTransaction>> {
        self.select_one("transactions", &[("id", id.to_string())])
            .await
    }

    async fn upsert_transaction(&self, transaction: SaleTransaction) -> StoreResult<()> {
        let existing = self.transaction_by_id(&transaction.id).await?;
        if existing.is_some() {
            let _: SaleTransaction = self
                .update_returning(
                    "transactions",
                    &[("id", transaction.id.clone())],
                    &transaction,
                )
                .await?;
        } else {
            let _: SaleTransaction = self.insert_returning("transactions", &transaction).await?;
        }
        Ok(())
    }

    async fn set_deduction_status(
        &self,
        transaction_id: &str,
        status: DeductionStatus,
    ) -> StoreResult<()> {
        let _: SaleTransaction = self
            .update_returning(
                "transactions",
                &[("id", transaction_id.to_string())],
                &json!({ "deduction_status": status }),
            )
            .await?;
        Ok(())
    }

    async fn transactions_by_status(
        &self,
        statuses: &[DeductionStatus],
    ) -> StoreResult<Vec<SaleTransaction>> {
        let mut out = Vec::new();
        for status in statuses {
            let value = serde_json::to_value(status)?;
            let key = value.as_str().unwrap_or_default().to_string();
            let mut rows: Vec<SaleTransaction> = self
                .select("transactions", &[("deduction_status", key)])
                .await?;
            out.append(&mut rows);
        }
        out.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(out)
    }
}
