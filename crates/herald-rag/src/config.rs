use serde::{Deserialize, Serialize};

/// Tuning knobs for querying and ingestion
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RagConfig {
    pub model: String,
    #[serde(default)]
    pub temperature: Option<f32>,
    /// Upper bound on articles used as grounding sources
    #[serde(default = "default_max_sources")]
    pub max_sources: usize,
    /// Prior messages included in the generation prompt
    #[serde(default = "default_history_turns")]
    pub history_turns: usize,
    /// Articles requested per ingestion run
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

fn default_max_sources() -> usize {
    5
}

fn default_history_turns() -> usize {
    4
}

fn default_batch_size() -> usize {
    50
}

impl RagConfig {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Self::default()
        }
    }

    pub fn with_temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }

    pub fn with_max_sources(mut self, max: usize) -> Self {
        self.max_sources = max;
        self
    }

    pub fn with_history_turns(mut self, turns: usize) -> Self {
        self.history_turns = turns;
        self
    }

    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size;
        self
    }
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            temperature: None,
            max_sources: default_max_sources(),
            history_turns: default_history_turns(),
            batch_size: default_batch_size(),
        }
    }
}
