//! Data models
//!
//! One file per hosted table group. All ids are UUID-like strings assigned by
//! the backend; `id` is `Option<String>` on rows the engine may insert.

pub mod catalog;
pub mod inventory;
pub mod movement;
pub mod recipe;
pub mod store;
pub mod template;
pub mod transaction;

// Re-exports
pub use catalog::{CategoryVocabulary, ProductCatalogEntry};
pub use inventory::InventoryItem;
pub use movement::{InventoryMovement, MovementType};
pub use recipe::{Recipe, RecipeIngredient};
pub use store::Store;
pub use template::{RecipeTemplate, TemplateIngredient};
pub use transaction::{DeductionStatus, SaleTransaction, TransactionItem};
