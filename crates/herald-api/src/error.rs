use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use herald_rag::RagError;
use serde_json::json;
use thiserror::Error;

pub const QUERY_UPSTREAM_MESSAGE: &str = "Error communicating with AI. Check API key.";
pub const INGEST_UPSTREAM_MESSAGE: &str = "Ingestion failed. Ensure API key is valid.";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("{0}")]
    Conflict(String),

    /// LLM or payload failure; the public message hides the cause
    #[error("{public}: {source}")]
    Upstream {
        public: &'static str,
        #[source]
        source: RagError,
    },

    #[error("Persistence error: {0}")]
    Persist(#[from] herald_persist::PersistError),

    #[error("Request timed out")]
    Timeout,

    /// Failure raised by a middleware layer rather than a handler
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Map a chat-query failure
    pub fn from_query(err: RagError) -> Self {
        Self::from_rag(err, QUERY_UPSTREAM_MESSAGE)
    }

    /// Map an ingestion failure
    pub fn from_ingestion(err: RagError) -> Self {
        Self::from_rag(err, INGEST_UPSTREAM_MESSAGE)
    }

    fn from_rag(err: RagError, public: &'static str) -> Self {
        match err {
            RagError::EmptyQuery => ApiError::BadRequest(err.to_string()),
            RagError::SessionBusy(_) | RagError::Cancelled(_) => ApiError::Conflict(err.to_string()),
            RagError::Persist(e) => ApiError::Persist(e),
            RagError::Llm(_) | RagError::MalformedPayload(_) => {
                ApiError::Upstream { public, source: err }
            }
        }
    }
}

impl From<RagError> for ApiError {
    fn from(err: RagError) -> Self {
        Self::from_query(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::Conflict(ref msg) => (StatusCode::CONFLICT, msg.clone()),
            ApiError::Upstream { public, ref source } => {
                tracing::error!("Upstream error: {}", source);
                (StatusCode::BAD_GATEWAY, public.to_string())
            }
            ApiError::Persist(ref e) => {
                tracing::error!("Persistence error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Storage error".to_string())
            }
            ApiError::Timeout => {
                tracing::warn!("Request exceeded the configured timeout");
                (StatusCode::REQUEST_TIMEOUT, self.to_string())
            }
            ApiError::Internal(ref cause) => {
                tracing::error!("Internal error: {}", cause);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
