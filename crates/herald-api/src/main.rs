use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use herald_api::{
    build_router,
    config::{Config, StorageBackend},
    state::AppState,
};
use herald_llm::ClientFactory;
use herald_persist::{KvPersistenceClient, PersistenceClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let config = Config::load()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    init_logging(&config);

    tracing::info!("Starting Herald API server");
    tracing::info!("Config loaded: {}:{}", config.server.host, config.server.port);

    tracing::info!(provider = ?config.llm.provider, model = %config.llm.model, "Initializing LLM client");
    let llm_client = ClientFactory::create_client(config.provider_config())?;

    let store: Arc<dyn PersistenceClient> = match config.storage.backend {
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on restart");
            Arc::new(KvPersistenceClient::in_memory())
        }
        StorageBackend::File => {
            tracing::info!(path = %config.storage.path.display(), "Using file storage");
            Arc::new(KvPersistenceClient::file(&config.storage.path).await?)
        }
    };

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = Arc::new(AppState::new(config, store, llm_client));
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);
    tracing::info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

fn init_logging(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.logging.format.as_str() {
        "json" => {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }
}
