//! Server state
//!
//! [`ServerState`] holds shared references to the datastore and every
//! service. Cloning is shallow (Arc all the way down), so axum handlers take
//! it by value.

use std::sync::Arc;

use tracing::{info, warn};

use crate::audit::LinkageAuditService;
use crate::core::Config;
use crate::deduction::{DeductionEngine, TransactionOrchestrator};
use crate::reconcile::ReconcileService;
use crate::store::{ApiContext, Datastore, MemoryStore, RestStore};
use crate::validate::PreTransactionValidator;

#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub store: Arc<dyn Datastore>,
    pub engine: Arc<DeductionEngine>,
    pub orchestrator: Arc<TransactionOrchestrator>,
    pub reconcile: Arc<ReconcileService>,
    pub audit: Arc<LinkageAuditService>,
    pub validator: Arc<PreTransactionValidator>,
}

impl ServerState {
    /// Initialize all services against the configured backend.
    ///
    /// With `BACKEND_URL` unset the in-memory store is used, fine for
    /// development, useless in production since it starts empty.
    pub async fn initialize(config: &Config) -> Self {
        let store: Arc<dyn Datastore> = match &config.backend_url {
            Some(url) => {
                info!(backend = %url, "using hosted table backend");
                Arc::new(RestStore::new(
                    url.clone(),
                    ApiContext::new(config.backend_api_key.clone()),
                ))
            }
            None => {
                warn!("BACKEND_URL not set, using in-memory store");
                Arc::new(MemoryStore::new())
            }
        };
        Self::with_store(config.clone(), store)
    }

    /// Wire services around an existing datastore.
    pub fn with_store(config: Config, store: Arc<dyn Datastore>) -> Self {
        let policy = config.policy.clone();
        let engine = Arc::new(DeductionEngine::new(store.clone(), policy.clone()));
        let orchestrator = Arc::new(TransactionOrchestrator::new(
            engine.clone(),
            store.clone(),
            policy.clone(),
        ));
        let reconcile = Arc::new(ReconcileService::new(
            store.clone(),
            orchestrator.clone(),
            policy,
        ));
        let audit = Arc::new(LinkageAuditService::new(store.clone()));
        let validator = Arc::new(PreTransactionValidator::new(engine.resolver().clone()));

        Self {
            config,
            store,
            engine,
            orchestrator,
            reconcile,
            audit,
            validator,
        }
    }

    /// Probe backend reachability for the health endpoint.
    pub async fn store_healthy(&self) -> bool {
        self.store.list_stores().await.is_ok()
    }
}

impl std::fmt::Debug for ServerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerState")
            .field("environment", &self.config.environment)
            .field("http_port", &self.config.http_port)
            .finish()
    }
}
