use axum::{extract::State, Json};
use std::sync::Arc;

use herald_rag::AnalyticsReport;

use crate::{error::ApiResult, state::AppState};

pub async fn get_analytics(State(state): State<Arc<AppState>>) -> ApiResult<Json<AnalyticsReport>> {
    let report = state.analytics.report().await?;
    Ok(Json(report))
}
