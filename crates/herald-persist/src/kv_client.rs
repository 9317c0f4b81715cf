use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::Mutex;

use crate::backend::{FileBackend, KeyValueBackend, MemoryBackend};
use crate::error::{PersistError, Result};
use crate::keys;
use crate::models::{Article, InteractionLog, Session, VectorEntry};
use crate::trait_client::PersistenceClient;

/// `PersistenceClient` over any `KeyValueBackend`
///
/// Each collection is one JSON array under a fixed key. Read-modify-write
/// operations (session upsert, log append) hold `write_lock` so concurrent
/// callers cannot lose each other's updates.
pub struct KvPersistenceClient {
    backend: Arc<dyn KeyValueBackend>,
    write_lock: Mutex<()>,
}

impl KvPersistenceClient {
    pub fn new(backend: Arc<dyn KeyValueBackend>) -> Self {
        Self {
            backend,
            write_lock: Mutex::new(()),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryBackend::new()))
    }

    pub async fn file(root: impl AsRef<Path>) -> Result<Self> {
        let backend = FileBackend::open(root).await?;
        Ok(Self::new(Arc::new(backend)))
    }

    /// Missing key reads as an empty collection; undecodable content is an error
    async fn read_collection<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>> {
        match self.backend.get(key).await? {
            None => Ok(Vec::new()),
            Some(raw) => {
                serde_json::from_str(&raw).map_err(|e| PersistError::serialization(key, e))
            }
        }
    }

    async fn write_collection<T: Serialize + Sync>(&self, key: &str, items: &[T]) -> Result<()> {
        let raw = serde_json::to_string(items).map_err(|e| PersistError::serialization(key, e))?;
        self.backend.set(key, raw).await
    }
}

#[async_trait]
impl PersistenceClient for KvPersistenceClient {
    async fn save_articles(&self, articles: Vec<Article>) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        self.write_collection(keys::ARTICLES, &articles).await?;
        tracing::debug!(count = articles.len(), "Articles saved");
        Ok(())
    }

    async fn get_articles(&self) -> Result<Vec<Article>> {
        self.read_collection(keys::ARTICLES).await
    }

    async fn save_vectors(&self, vectors: Vec<VectorEntry>) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        self.write_collection(keys::VECTORS, &vectors).await
    }

    async fn get_vectors(&self) -> Result<Vec<VectorEntry>> {
        self.read_collection(keys::VECTORS).await
    }

    async fn get_session(&self, session_id: &str) -> Result<Option<Session>> {
        let sessions: Vec<Session> = self.read_collection(keys::SESSIONS).await?;
        Ok(sessions.into_iter().find(|s| s.id == session_id))
    }

    async fn save_session(&self, session: Session) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut sessions: Vec<Session> = self.read_collection(keys::SESSIONS).await?;

        match sessions.iter_mut().find(|s| s.id == session.id) {
            Some(existing) => *existing = session,
            None => sessions.push(session),
        }

        self.write_collection(keys::SESSIONS, &sessions).await
    }

    async fn clear_session(&self, session_id: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut sessions: Vec<Session> = self.read_collection(keys::SESSIONS).await?;
        let before = sessions.len();
        sessions.retain(|s| s.id != session_id);

        if sessions.len() != before {
            self.write_collection(keys::SESSIONS, &sessions).await?;
            tracing::debug!(session_id, "Session cleared");
        }
        Ok(())
    }

    async fn list_sessions(&self) -> Result<Vec<Session>> {
        self.read_collection(keys::SESSIONS).await
    }

    async fn log_interaction(&self, log: InteractionLog) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut logs: Vec<InteractionLog> = self.read_collection(keys::LOGS).await?;
        logs.push(log);
        self.write_collection(keys::LOGS, &logs).await
    }

    async fn get_logs(&self) -> Result<Vec<InteractionLog>> {
        self.read_collection(keys::LOGS).await
    }
}
