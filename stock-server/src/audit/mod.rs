//! Linkage Repair / Audit Service
//!
//! Batch, read-heavy scans over the product → recipe → template and
//! recipe-ingredient → inventory linkage chain, plus the conservative
//! auto-repair path. Repairs only ever apply perfect matches; zero or
//! multiple candidates leave the product unmapped and reported; ambiguity
//! is never guessed away.

pub mod service;
pub mod types;

pub use service::LinkageAuditService;
pub use types::{
    ConsistencyClass, DuplicateGroup, LinkageReport, LowStockItem, RecipeConsistency,
    RepairAction, RepairKind, RepairResult, UnmappedProduct,
};
