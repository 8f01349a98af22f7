//! Shared types for the croffle stock engine
//!
//! Data models mirroring the hosted table schema, request/response DTOs for
//! the POS and operator surfaces, and the unified API response envelope.

pub mod models;
pub mod request;
pub mod response;
pub mod types;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use request::{SaleInput, SaleLineInput};
pub use response::ApiResponse;
pub use types::normalize_name;
