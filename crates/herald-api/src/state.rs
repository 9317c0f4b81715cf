use std::sync::Arc;

use herald_llm::ChatClient;
use herald_persist::PersistenceClient;
use herald_rag::{Analytics, MockIngestor, QueryOrchestrator, RagConfig};

use crate::config::Config;

/// Shared application state passed to all handlers
///
/// The orchestrator owns the per-session gate, so there must be exactly one
/// per process.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn PersistenceClient>,
    pub orchestrator: Arc<QueryOrchestrator>,
    pub ingestor: Arc<MockIngestor>,
    pub analytics: Arc<Analytics>,
    pub provider: String,
}

impl AppState {
    pub fn new(
        config: Config,
        store: Arc<dyn PersistenceClient>,
        llm_client: Arc<dyn ChatClient>,
    ) -> Self {
        let rag_config: RagConfig = config.rag_config();
        let provider = llm_client.provider_name().to_string();

        let orchestrator =
            QueryOrchestrator::new(llm_client.clone(), store.clone(), rag_config.clone());
        let ingestor = MockIngestor::new(llm_client, store.clone(), rag_config);
        let analytics = Analytics::new(store.clone());

        Self {
            config: Arc::new(config),
            store,
            orchestrator: Arc::new(orchestrator),
            ingestor: Arc::new(ingestor),
            analytics: Arc::new(analytics),
            provider,
        }
    }
}
