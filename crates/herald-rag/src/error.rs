use herald_persist::PersistError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RagError {
    #[error("Query must not be empty")]
    EmptyQuery,

    #[error("Session '{0}' already has a query in flight")]
    SessionBusy(String),

    #[error("Query for session '{0}' was cancelled")]
    Cancelled(String),

    #[error("LLM call failed: {0:#}")]
    Llm(#[source] anyhow::Error),

    #[error("Malformed ingestion payload: {0}")]
    MalformedPayload(String),

    #[error(transparent)]
    Persist(#[from] PersistError),
}

pub type Result<T> = std::result::Result<T, RagError>;
