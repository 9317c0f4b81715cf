#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use herald_llm::{ChatClient, ChatRequest, ChatResponse, TokenUsage};
use herald_persist::{
    Article, Category, InteractionLog, KvPersistenceClient, PersistError, PersistenceClient,
    Session, VectorEntry,
};

type PersistResult<T> = std::result::Result<T, PersistError>;

/// Replays canned replies in order and records every request
#[derive(Default)]
pub struct ScriptedClient {
    replies: Mutex<VecDeque<Result<String>>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedClient {
    pub fn new(replies: Vec<&str>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into_iter().map(|r| Ok(r.to_string())).collect()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(VecDeque::from(vec![Err(anyhow!(message.to_string()))])),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn push(&self, reply: &str) {
        self.replies.lock().unwrap().push_back(Ok(reply.to_string()));
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl ChatClient for ScriptedClient {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        self.requests.lock().unwrap().push(request);
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(anyhow!("no scripted reply left")))?;

        Ok(ChatResponse {
            content: Some(reply),
            usage: Some(TokenUsage {
                input_tokens: 10,
                output_tokens: 5,
                total_tokens: 15,
            }),
            finish_reason: Some("stop".to_string()),
            raw: serde_json::Value::Null,
        })
    }

    fn provider_name(&self) -> &str {
        "scripted"
    }
}

/// Never answers; used to hold a query in flight
pub struct StalledClient;

#[async_trait]
impl ChatClient for StalledClient {
    async fn chat(&self, _request: ChatRequest) -> Result<ChatResponse> {
        std::future::pending::<()>().await;
        Err(anyhow!("unreachable"))
    }
}

pub fn article(id: &str, title: &str, category: Category) -> Article {
    Article {
        id: id.to_string(),
        title: title.to_string(),
        content: format!("Full story about {}.", title),
        url: format!("https://news.example.com/{}", id),
        published_at: "2024-05-20".to_string(),
        source: "Example Wire".to_string(),
        category,
    }
}

pub async fn seeded_store(articles: Vec<Article>) -> Arc<dyn PersistenceClient> {
    let store = Arc::new(KvPersistenceClient::in_memory());
    store.save_articles(articles).await.unwrap();
    store
}

pub fn library() -> Vec<Article> {
    vec![
        article("t1", "New AI model tops benchmarks", Category::Technology),
        article("f1", "Central bank holds rates", Category::Finance),
        article("s1", "Fusion reactor sustains plasma", Category::Science),
        article("h1", "Malaria vaccine rollout expands", Category::Health),
    ]
}

/// Store whose first `save_session` call parks until released
pub struct PausingStore {
    inner: KvPersistenceClient,
    pub entered: tokio::sync::Notify,
    pub release: tokio::sync::Notify,
    paused: std::sync::atomic::AtomicBool,
}

impl PausingStore {
    pub async fn seeded(articles: Vec<Article>) -> Arc<Self> {
        let inner = KvPersistenceClient::in_memory();
        inner.save_articles(articles).await.unwrap();
        Arc::new(Self {
            inner,
            entered: tokio::sync::Notify::new(),
            release: tokio::sync::Notify::new(),
            paused: std::sync::atomic::AtomicBool::new(false),
        })
    }
}

#[async_trait]
impl PersistenceClient for PausingStore {
    async fn save_articles(&self, articles: Vec<Article>) -> PersistResult<()> {
        self.inner.save_articles(articles).await
    }

    async fn get_articles(&self) -> PersistResult<Vec<Article>> {
        self.inner.get_articles().await
    }

    async fn save_vectors(&self, vectors: Vec<VectorEntry>) -> PersistResult<()> {
        self.inner.save_vectors(vectors).await
    }

    async fn get_vectors(&self) -> PersistResult<Vec<VectorEntry>> {
        self.inner.get_vectors().await
    }

    async fn get_session(&self, session_id: &str) -> PersistResult<Option<Session>> {
        self.inner.get_session(session_id).await
    }

    async fn save_session(&self, session: Session) -> PersistResult<()> {
        if !self.paused.swap(true, std::sync::atomic::Ordering::SeqCst) {
            self.entered.notify_one();
            self.release.notified().await;
        }
        self.inner.save_session(session).await
    }

    async fn clear_session(&self, session_id: &str) -> PersistResult<()> {
        self.inner.clear_session(session_id).await
    }

    async fn list_sessions(&self) -> PersistResult<Vec<Session>> {
        self.inner.list_sessions().await
    }

    async fn log_interaction(&self, log: InteractionLog) -> PersistResult<()> {
        self.inner.log_interaction(log).await
    }

    async fn get_logs(&self) -> PersistResult<Vec<InteractionLog>> {
        self.inner.get_logs().await
    }
}
