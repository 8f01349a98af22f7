//! Croffle Stock Server - recipe-to-inventory deduction engine
//!
//! # Architecture overview
//!
//! Given a completed POS sale, the engine determines which raw-inventory
//! stock units to decrement, applies the deduction with an append-only
//! movement trail, and exposes the repair/rollback tooling that keeps the
//! product → recipe → template → inventory linkage chain healthy.
//!
//! # Module structure
//!
//! ```text
//! stock-server/src/
//! ├── core/       # config, state, HTTP bootstrap
//! ├── store/      # datastore trait + REST / in-memory backends
//! ├── matching/   # ingredient → inventory name matching
//! ├── resolver/   # product → recipe / template resolution
//! ├── mixmatch/   # composite display-name parsing
//! ├── deduction/  # per-line engine + transaction orchestrator
//! ├── reconcile/  # rollback and correction services
//! ├── audit/      # linkage audit and auto-repair
//! ├── validate/   # pre-transaction gate
//! ├── api/        # HTTP routes and handlers
//! └── utils/      # errors, logging
//! ```

pub mod api;
pub mod audit;
pub mod core;
pub mod deduction;
pub mod matching;
pub mod mixmatch;
pub mod reconcile;
pub mod resolver;
pub mod store;
pub mod utils;
pub mod validate;

// Re-export public types
pub use self::core::{Config, EnginePolicy, FailurePolicy, Server, ServerState};
pub use deduction::{DeductionEngine, TransactionOrchestrator};
pub use matching::{MatchOutcome, match_ingredient};
pub use resolver::RecipeResolver;
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

pub fn print_banner() {
    println!(
        r#"
   _____ __             __
  / ___// /_____  _____/ /__
  \__ \/ __/ __ \/ ___/ //_/
 ___/ / /_/ /_/ / /__/ ,<
/____/\__/\____/\___/_/|_|
   Croffle Stock Server
    "#
    );
}
