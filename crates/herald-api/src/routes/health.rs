use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub services: HashMap<String, String>,
}

/// Health check endpoint
///
/// Reports storage reachability and the configured LLM provider
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let mut services = HashMap::new();

    let storage = match state.store.get_articles().await {
        Ok(_) => "reachable",
        Err(e) => {
            tracing::warn!("Storage health check failed: {}", e);
            "unreachable"
        }
    };
    services.insert("storage".to_string(), storage.to_string());
    services.insert("llm".to_string(), state.provider.clone());

    let status = if storage == "reachable" { "healthy" } else { "degraded" };

    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        services,
    })
}
