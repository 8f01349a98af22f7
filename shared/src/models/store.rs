//! Store Model

use serde::{Deserialize, Serialize};

/// A physical store. Scope boundary for inventory, recipes, and catalog
/// entries; the engine never follows a reference across stores.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Store {
    pub id: String,
    pub name: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}
