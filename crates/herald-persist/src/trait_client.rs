use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Article, InteractionLog, Session, VectorEntry};

/// Trait for the four persisted collections
///
/// Articles and vectors are read and replaced whole. Sessions are looked up,
/// upserted and deleted by id. Logs are append-only.
#[async_trait]
pub trait PersistenceClient: Send + Sync {
    /// Replace the whole article collection
    async fn save_articles(&self, articles: Vec<Article>) -> Result<()>;

    async fn get_articles(&self) -> Result<Vec<Article>>;

    /// Replace the article collection with an empty one
    async fn clear_articles(&self) -> Result<()> {
        self.save_articles(Vec::new()).await
    }

    async fn save_vectors(&self, vectors: Vec<VectorEntry>) -> Result<()>;

    async fn get_vectors(&self) -> Result<Vec<VectorEntry>>;

    async fn get_session(&self, session_id: &str) -> Result<Option<Session>>;

    /// Insert the session, or overwrite the one with the same id
    async fn save_session(&self, session: Session) -> Result<()>;

    /// Delete the session record entirely
    async fn clear_session(&self, session_id: &str) -> Result<()>;

    async fn list_sessions(&self) -> Result<Vec<Session>>;

    /// Append one entry to the interaction log
    async fn log_interaction(&self, log: InteractionLog) -> Result<()>;

    async fn get_logs(&self) -> Result<Vec<InteractionLog>>;
}
