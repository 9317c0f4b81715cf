use std::sync::Arc;

use anyhow::anyhow;
use chrono::Utc;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use herald_llm::{ChatClient, ChatOptions, ChatRequest, ChatResponse, Message};
use herald_persist::{Article, ChatMessage, InteractionLog, PersistenceClient, Session};

use crate::config::RagConfig;
use crate::context::{build_generation_prompt, build_grounding_context, render_history};
use crate::error::{RagError, Result};
use crate::gate::SessionGate;
use crate::selection::{build_selection_prompt, parse_selection};
use crate::templates::{ANALYST_SYSTEM_PROMPT, EMPTY_RESPONSE_FALLBACK, NO_DOCUMENTS_MESSAGE};

/// Answer to one chat query
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryOutcome {
    pub response: String,
    pub sources: Vec<Article>,
    pub response_time_ms: u64,
}

/// Runs the select-then-generate pipeline for chat queries
///
/// Each query makes two sequential LLM calls: one to pick relevant articles
/// by headline, one to answer from those articles. The interaction log and
/// the session are written only after both calls succeed.
pub struct QueryOrchestrator {
    llm_client: Arc<dyn ChatClient>,
    store: Arc<dyn PersistenceClient>,
    gate: SessionGate,
    config: RagConfig,
}

impl QueryOrchestrator {
    pub fn new(
        llm_client: Arc<dyn ChatClient>,
        store: Arc<dyn PersistenceClient>,
        config: RagConfig,
    ) -> Self {
        Self {
            llm_client,
            store,
            gate: SessionGate::new(),
            config,
        }
    }

    pub fn builder() -> QueryOrchestratorBuilder {
        QueryOrchestratorBuilder::new()
    }

    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    pub fn gate(&self) -> &SessionGate {
        &self.gate
    }

    pub async fn query(&self, session_id: &str, query: &str) -> Result<QueryOutcome> {
        let query = query.trim();
        if query.is_empty() {
            return Err(RagError::EmptyQuery);
        }

        let permit = self
            .gate
            .acquire(session_id)
            .ok_or_else(|| RagError::SessionBusy(session_id.to_string()))?;
        let token = permit.token();

        let start = Utc::now().timestamp_millis();
        info!(session_id, query_len = query.chars().count(), "Query started");

        let articles = self.store.get_articles().await?;
        if articles.is_empty() {
            info!(session_id, "No articles ingested, returning fallback");
            return Ok(QueryOutcome {
                response: NO_DOCUMENTS_MESSAGE.to_string(),
                sources: Vec::new(),
                response_time_ms: 0,
            });
        }

        // Relevance selection
        let selection_prompt = build_selection_prompt(query, &articles, self.config.max_sources);
        debug!(
            session_id,
            articles = articles.len(),
            prompt_len = selection_prompt.len(),
            "Requesting relevance selection"
        );
        let request = ChatRequest::from_prompt(&self.config.model, selection_prompt)
            .with_options(self.chat_options());
        let reply = self.complete(session_id, token, request).await?;

        let selection = parse_selection(reply.text(), articles.len(), self.config.max_sources);
        if selection.rejected > 0 {
            warn!(
                session_id,
                rejected = selection.rejected,
                reply = reply.text(),
                "Selection reply contained invalid article ids"
            );
        }
        debug!(session_id, indices = ?selection.indices, "Articles selected");

        let sources: Vec<Article> = selection
            .indices
            .iter()
            .filter_map(|&i| articles.get(i).cloned())
            .collect();

        // Generation
        let session = self.store.get_session(session_id).await?;
        let history = session
            .as_ref()
            .map(|s| render_history(s.recent(self.config.history_turns)))
            .unwrap_or_default();
        let context = build_grounding_context(&sources);
        let prompt = build_generation_prompt(&context, &history, query);
        debug!(session_id, prompt_len = prompt.len(), "Requesting grounded answer");

        let request = ChatRequest::new(
            &self.config.model,
            vec![Message::system(ANALYST_SYSTEM_PROMPT), Message::human(prompt)],
        )
        .with_options(self.chat_options());
        let answer = self.complete(session_id, token, request).await?;

        let response = if answer.text().trim().is_empty() {
            EMPTY_RESPONSE_FALLBACK.to_string()
        } else {
            answer.text().to_string()
        };
        let end = Utc::now().timestamp_millis();
        let response_time_ms = u64::try_from(end - start).unwrap_or(0);

        // Held until both writes land so a reset cannot interleave with them
        let _commit = permit
            .begin_commit()
            .await
            .ok_or_else(|| RagError::Cancelled(session_id.to_string()))?;

        let mut session = session.unwrap_or_else(|| Session::new(session_id, start));
        session.history.push(ChatMessage::user(query, start));
        session.history.push(ChatMessage::assistant(response.clone(), end));
        session.last_used = end;
        self.store.save_session(session).await?;

        self.store
            .log_interaction(InteractionLog {
                timestamp: Utc::now(),
                session_id: session_id.to_string(),
                user_query: query.to_string(),
                llm_response: response.clone(),
                response_time_ms,
                tokens: answer.usage.as_ref().map(|u| u.total_tokens),
            })
            .await?;

        info!(
            session_id,
            sources = sources.len(),
            response_time_ms,
            "Query completed"
        );

        Ok(QueryOutcome {
            response,
            sources,
            response_time_ms,
        })
    }

    /// Stored session, `None` when the id has never completed a query
    pub async fn session(&self, session_id: &str) -> Result<Option<Session>> {
        Ok(self.store.get_session(session_id).await?)
    }

    pub async fn history(&self, session_id: &str) -> Result<Vec<ChatMessage>> {
        Ok(self
            .session(session_id)
            .await?
            .map(|s| s.history)
            .unwrap_or_default())
    }

    /// Drop the session record
    ///
    /// An in-flight query on the session is cancelled first; if it is already
    /// writing, the reset waits for those writes and then removes them.
    pub async fn reset_session(&self, session_id: &str) -> Result<()> {
        if self.gate.cancel_and_wait(session_id).await {
            info!(session_id, "Cancelled in-flight query before reset");
        }
        self.store.clear_session(session_id).await?;
        info!(session_id, "Session reset");
        Ok(())
    }

    pub fn cancel(&self, session_id: &str) -> bool {
        let cancelled = self.gate.cancel(session_id);
        if cancelled {
            info!(session_id, "Query cancellation requested");
        }
        cancelled
    }

    fn chat_options(&self) -> ChatOptions {
        match self.config.temperature {
            Some(temp) => ChatOptions::new().temperature(temp),
            None => ChatOptions::new(),
        }
    }

    async fn complete(
        &self,
        session_id: &str,
        token: &CancellationToken,
        request: ChatRequest,
    ) -> Result<ChatResponse> {
        tokio::select! {
            _ = token.cancelled() => Err(RagError::Cancelled(session_id.to_string())),
            result = self.llm_client.chat(request) => result.map_err(RagError::Llm),
        }
    }
}

/// Random identifier of the form `session-xxxxxxxxx`
pub fn new_session_id() -> String {
    let id = uuid::Uuid::new_v4().simple().to_string();
    format!("session-{}", &id[..9])
}

/// Builder for a `QueryOrchestrator`
pub struct QueryOrchestratorBuilder {
    llm_client: Option<Arc<dyn ChatClient>>,
    store: Option<Arc<dyn PersistenceClient>>,
    config: RagConfig,
}

impl QueryOrchestratorBuilder {
    pub fn new() -> Self {
        Self {
            llm_client: None,
            store: None,
            config: RagConfig::default(),
        }
    }

    pub fn llm_client(mut self, client: Arc<dyn ChatClient>) -> Self {
        self.llm_client = Some(client);
        self
    }

    pub fn store(mut self, store: Arc<dyn PersistenceClient>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn config(mut self, config: RagConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> anyhow::Result<QueryOrchestrator> {
        let llm_client = self
            .llm_client
            .ok_or_else(|| anyhow!("LLM client is required"))?;
        let store = self
            .store
            .ok_or_else(|| anyhow!("Persistence client is required"))?;

        Ok(QueryOrchestrator::new(llm_client, store, self.config))
    }
}

impl Default for QueryOrchestratorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_id_shape() {
        let id = new_session_id();
        let suffix = id.strip_prefix("session-").unwrap();
        assert_eq!(suffix.len(), 9);
        assert!(suffix.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
        assert_ne!(new_session_id(), id);
    }

    #[test]
    fn test_builder_requires_clients() {
        let err = QueryOrchestrator::builder().build().err().unwrap();
        assert!(err.to_string().contains("LLM client is required"));
    }
}
