use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use herald_persist::Article;
use herald_rag::IngestReport;

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
};

/// Current article library
pub async fn list_articles(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Article>>> {
    let articles = state.ingestor.articles().await?;
    Ok(Json(articles))
}

/// Generate a fresh batch and replace the library
pub async fn ingest_articles(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<IngestReport>> {
    let report = state
        .ingestor
        .ingest()
        .await
        .map_err(ApiError::from_ingestion)?;
    Ok(Json(report))
}

pub async fn clear_articles(State(state): State<Arc<AppState>>) -> ApiResult<StatusCode> {
    state.ingestor.clear_library().await?;
    Ok(StatusCode::NO_CONTENT)
}
