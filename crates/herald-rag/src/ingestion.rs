use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use herald_llm::{ChatClient, ChatOptions, ChatRequest};
use herald_persist::{Article, Category, PersistenceClient};

use crate::analytics::{count_by_category, CategoryCount};
use crate::config::RagConfig;
use crate::error::{RagError, Result};
use crate::templates::INGESTION_PROMPT_TEMPLATE;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestReport {
    pub ingested: usize,
    pub by_category: Vec<CategoryCount>,
}

/// Fills the article library with LLM-generated news
pub struct MockIngestor {
    llm_client: Arc<dyn ChatClient>,
    store: Arc<dyn PersistenceClient>,
    config: RagConfig,
}

impl MockIngestor {
    pub fn new(
        llm_client: Arc<dyn ChatClient>,
        store: Arc<dyn PersistenceClient>,
        config: RagConfig,
    ) -> Self {
        Self {
            llm_client,
            store,
            config,
        }
    }

    /// Generate a fresh batch and replace the library with it
    ///
    /// Nothing is written unless the whole batch decodes.
    pub async fn ingest(&self) -> Result<IngestReport> {
        let batch_size = self.config.batch_size;
        info!(batch_size, model = %self.config.model, "Generating article batch");

        let mut options = ChatOptions::new().json();
        if let Some(temp) = self.config.temperature {
            options = options.temperature(temp);
        }
        let request =
            ChatRequest::from_prompt(&self.config.model, build_ingestion_prompt(batch_size))
                .with_options(options);

        let response = self.llm_client.chat(request).await.map_err(RagError::Llm)?;
        let articles = decode_articles(response.text()).map_err(|e| {
            warn!(error = %e, "Rejected ingestion payload");
            e
        })?;

        if articles.len() != batch_size {
            warn!(
                requested = batch_size,
                received = articles.len(),
                "Article count differs from requested batch size"
            );
        }

        let report = IngestReport {
            ingested: articles.len(),
            by_category: count_by_category(&articles),
        };

        self.store.save_articles(articles).await?;
        // Stored embeddings describe the previous library
        self.store.save_vectors(Vec::new()).await?;

        info!(ingested = report.ingested, "Article library replaced");
        Ok(report)
    }

    pub async fn clear_library(&self) -> Result<()> {
        self.store.clear_articles().await?;
        self.store.save_vectors(Vec::new()).await?;
        info!("Article library cleared");
        Ok(())
    }

    pub async fn articles(&self) -> Result<Vec<Article>> {
        Ok(self.store.get_articles().await?)
    }
}

pub fn build_ingestion_prompt(count: usize) -> String {
    let categories = Category::ALL
        .iter()
        .map(|c| c.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    INGESTION_PROMPT_TEMPLATE
        .replace("<count>", &count.to_string())
        .replace("<categories>", &categories)
}

/// Strictly decode a generated batch
///
/// Accepts a bare array or an object wrapping it under `articles`. Every
/// record must carry the full schema with non-empty text fields, a parseable
/// `publishedAt` and a batch-unique id.
pub fn decode_articles(raw: &str) -> Result<Vec<Article>> {
    let value: Value = serde_json::from_str(raw.trim())
        .map_err(|e| RagError::MalformedPayload(format!("invalid JSON: {}", e)))?;

    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("articles") {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(RagError::MalformedPayload(
                    "expected an array or an object with an 'articles' array".to_string(),
                ))
            }
        },
        _ => {
            return Err(RagError::MalformedPayload(
                "expected an array of articles".to_string(),
            ))
        }
    };

    if items.is_empty() {
        return Err(RagError::MalformedPayload("batch contains no articles".to_string()));
    }

    let mut seen = HashSet::new();
    let mut articles = Vec::with_capacity(items.len());

    for (i, item) in items.into_iter().enumerate() {
        let article: Article = serde_json::from_value(item)
            .map_err(|e| RagError::MalformedPayload(format!("article {}: {}", i, e)))?;
        validate_article(i, &article)?;

        if !seen.insert(article.id.clone()) {
            return Err(RagError::MalformedPayload(format!(
                "article {}: duplicate id '{}'",
                i, article.id
            )));
        }
        articles.push(article);
    }

    Ok(articles)
}

fn validate_article(index: usize, article: &Article) -> Result<()> {
    let required = [
        ("id", &article.id),
        ("title", &article.title),
        ("content", &article.content),
        ("source", &article.source),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            return Err(RagError::MalformedPayload(format!(
                "article {}: empty {}",
                index, field
            )));
        }
    }

    let published = article.published_at.trim();
    let parses = DateTime::parse_from_rfc3339(published).is_ok()
        || NaiveDate::parse_from_str(published, "%Y-%m-%d").is_ok();
    if !parses {
        return Err(RagError::MalformedPayload(format!(
            "article {}: unparseable publishedAt '{}'",
            index, article.published_at
        )));
    }

    Ok(())
}
