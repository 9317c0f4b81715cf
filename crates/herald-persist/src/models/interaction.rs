use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Append-only record of one answered query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionLog {
    pub timestamp: DateTime<Utc>,
    pub session_id: String,
    pub user_query: String,
    pub llm_response: String,
    pub response_time_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokens: Option<u32>,
}
