//! Rollback / Correction Service
//!
//! Two operator entry points over the movement log:
//!
//! - [`ReconcileService::rollback`]: reverse a transaction's applied
//!   deductions by appending compensating movement rows; history is never
//!   mutated or deleted.
//! - [`ReconcileService::correct_transaction`]: re-run resolution and
//!   deduction for a transaction whose deduction never (fully) happened,
//!   skipping every ingredient that already has a movement row.
//!
//! Both are safe to invoke any number of times.

pub mod service;
pub mod types;

pub use service::ReconcileService;
pub use types::{ReconciliationResult, RestoredItem, RollbackResult};
