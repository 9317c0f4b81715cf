use crate::types::Message;
use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Trait for text-generation backends
///
/// One request in, one completed response out. Implementations talk to a
/// hosted provider; tests substitute scripted fakes.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Non-streaming completion
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse>;

    /// Short provider name used in logs and health output
    fn provider_name(&self) -> &str {
        "unknown"
    }
}

#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub options: ChatOptions,
}

impl ChatRequest {
    pub fn new(model: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            model: model.into(),
            messages,
            options: ChatOptions::default(),
        }
    }

    /// Single user prompt, no system instruction
    pub fn from_prompt(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self::new(model, vec![Message::human(prompt)])
    }

    pub fn with_options(mut self, options: ChatOptions) -> Self {
        self.options = options;
        self
    }

    pub fn wants_json(&self) -> bool {
        self.options.response_format == Some(ResponseFormat::Json)
    }
}

/// Shape the provider is asked to return
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatOptions {
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub response_format: Option<ResponseFormat>,
}

impl ChatOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }

    pub fn max_tokens(mut self, tokens: u32) -> Self {
        self.max_tokens = Some(tokens);
        self
    }

    pub fn response_format(mut self, format: ResponseFormat) -> Self {
        self.response_format = Some(format);
        self
    }

    /// Constrain the completion to a JSON payload
    pub fn json(self) -> Self {
        self.response_format(ResponseFormat::Json)
    }
}

#[derive(Debug, Clone)]
pub struct ChatResponse {
    pub content: Option<String>,
    pub usage: Option<TokenUsage>,
    pub finish_reason: Option<String>,
    pub raw: serde_json::Value,
}

impl ChatResponse {
    /// Generated text, empty when the provider returned none
    pub fn text(&self) -> &str {
        self.content.as_deref().unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub total_tokens: u32,
}
