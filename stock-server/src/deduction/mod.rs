//! Deduction Engine
//!
//! Turns a completed sale into concrete inventory writes:
//!
//! ```text
//! process_sale(sale)
//!     ├─ 1. Persist transaction, PENDING → PROCESSING
//!     ├─ 2. Per line item (sequential):
//!     │      ├─ resolve ingredients (recipe / template fallback)
//!     │      ├─ Mix & Match filter for composite display names
//!     │      ├─ per ingredient: idempotence probe → re-read stock →
//!     │      │    insufficient? record error, skip write
//!     │      │    else update stock + append movement row
//!     ├─ 3. COMPLETED | PARTIALLY_FAILED | FAILED recorded
//!     └─ 4. Aggregate TransactionDeductionResult
//! ```

pub mod engine;
pub mod orchestrator;

pub use engine::DeductionEngine;
pub use orchestrator::TransactionOrchestrator;

#[cfg(test)]
mod tests;
