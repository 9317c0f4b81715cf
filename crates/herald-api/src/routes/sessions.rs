use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use herald_persist::ChatMessage;
use herald_rag::{new_session_id, QueryOutcome};

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionResponse {
    pub session_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub session_id: String,
    pub history: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_used: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub query: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CancelResponse {
    pub cancelled: bool,
}

/// Mint a session id; nothing is stored until the first query completes
pub async fn create_session() -> (StatusCode, Json<CreateSessionResponse>) {
    (
        StatusCode::CREATED,
        Json(CreateSessionResponse {
            session_id: new_session_id(),
        }),
    )
}

pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> ApiResult<Json<SessionResponse>> {
    let session = state.orchestrator.session(&session_id).await?;

    let response = match session {
        Some(session) => SessionResponse {
            session_id: session.id,
            history: session.history,
            last_used: Some(session.last_used),
        },
        None => SessionResponse {
            session_id,
            history: Vec::new(),
            last_used: None,
        },
    };
    Ok(Json(response))
}

pub async fn reset_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> ApiResult<StatusCode> {
    state.orchestrator.reset_session(&session_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Run one chat turn against the article library
pub async fn query_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    Json(req): Json<QueryRequest>,
) -> ApiResult<Json<QueryOutcome>> {
    let outcome = state
        .orchestrator
        .query(&session_id, &req.query)
        .await
        .map_err(ApiError::from_query)?;
    Ok(Json(outcome))
}

pub async fn cancel_query(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Json<CancelResponse> {
    Json(CancelResponse {
        cancelled: state.orchestrator.cancel(&session_id),
    })
}
