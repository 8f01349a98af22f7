//! Core Module
//!
//! Configuration, server state, and HTTP server bootstrap.

pub mod config;
pub mod server;
pub mod state;

pub use config::{Config, EnginePolicy, FailurePolicy};
pub use server::Server;
pub use state::ServerState;
