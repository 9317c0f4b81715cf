use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;

use herald_persist::{Article, Category, InteractionLog, PersistenceClient};

use crate::error::Result;

/// Interactions slower than this count as slow
pub const SLOW_RESPONSE_THRESHOLD_MS: u64 = 2000;

const LATENCY_TREND_WINDOW: usize = 20;
const RECENT_INTERACTIONS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    pub category: Category,
    pub count: usize,
}

/// One point of the latency chart; lengths are in characters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LatencyPoint {
    pub index: usize,
    pub response_time_ms: u64,
    pub query_length: usize,
    pub response_length: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    pub total_interactions: usize,
    pub avg_response_time_ms: u64,
    pub unique_sessions: usize,
    pub slow_interactions: usize,
    pub total_articles: usize,
    pub articles_by_category: Vec<CategoryCount>,
    pub latency_trend: Vec<LatencyPoint>,
    /// Newest first
    pub recent_interactions: Vec<InteractionLog>,
}

/// Article counts for every category, zeros included
pub fn count_by_category(articles: &[Article]) -> Vec<CategoryCount> {
    Category::ALL
        .iter()
        .map(|&category| CategoryCount {
            category,
            count: articles.iter().filter(|a| a.category == category).count(),
        })
        .collect()
}

/// Derive the report from a snapshot of logs and articles
pub fn summarize(logs: &[InteractionLog], articles: &[Article]) -> AnalyticsReport {
    let total = logs.len();
    let avg_response_time_ms = if total == 0 {
        0
    } else {
        let sum: u64 = logs.iter().map(|l| l.response_time_ms).sum();
        (sum as f64 / total as f64).round() as u64
    };

    let unique_sessions = logs
        .iter()
        .map(|l| l.session_id.as_str())
        .collect::<HashSet<_>>()
        .len();

    let slow_interactions = logs
        .iter()
        .filter(|l| l.response_time_ms > SLOW_RESPONSE_THRESHOLD_MS)
        .count();

    let latency_trend = logs[total.saturating_sub(LATENCY_TREND_WINDOW)..]
        .iter()
        .enumerate()
        .map(|(i, l)| LatencyPoint {
            index: i + 1,
            response_time_ms: l.response_time_ms,
            query_length: l.user_query.chars().count(),
            response_length: l.llm_response.chars().count(),
        })
        .collect();

    let recent_interactions = logs
        .iter()
        .rev()
        .take(RECENT_INTERACTIONS)
        .cloned()
        .collect();

    AnalyticsReport {
        total_interactions: total,
        avg_response_time_ms,
        unique_sessions,
        slow_interactions,
        total_articles: articles.len(),
        articles_by_category: count_by_category(articles),
        latency_trend,
        recent_interactions,
    }
}

/// Recomputes the report from storage on every call
pub struct Analytics {
    store: Arc<dyn PersistenceClient>,
}

impl Analytics {
    pub fn new(store: Arc<dyn PersistenceClient>) -> Self {
        Self { store }
    }

    pub async fn report(&self) -> Result<AnalyticsReport> {
        let logs = self.store.get_logs().await?;
        let articles = self.store.get_articles().await?;
        Ok(summarize(&logs, &articles))
    }
}
