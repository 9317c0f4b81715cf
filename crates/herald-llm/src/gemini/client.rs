// Google Gemini generateContent client

use crate::traits::{ChatClient, ChatOptions, ChatRequest, ChatResponse, ResponseFormat, TokenUsage};
use crate::types::Message;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini client (HTTP direct, no SDK)
///
/// Gemini differs from OpenAI-style APIs:
/// - URL: {base}/models/{model}:generateContent
/// - Auth header: x-goog-api-key
/// - System prompt travels in `systemInstruction`, assistant turns use role "model"
#[derive(Debug)]
pub struct GeminiClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl GeminiClient {
    pub fn builder() -> GeminiClientBuilder {
        GeminiClientBuilder::default()
    }

    fn build_url(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.base_url, model)
    }

    fn build_generate_request(&self, messages: &[Message], options: &ChatOptions) -> Value {
        let mut system_parts = Vec::new();
        let mut contents = Vec::new();

        for message in messages {
            match message {
                Message::System { content } => {
                    system_parts.push(serde_json::json!({ "text": content }));
                }
                Message::Human { content } => {
                    contents.push(serde_json::json!({
                        "role": "user",
                        "parts": [{ "text": content }],
                    }));
                }
                Message::AI { content } => {
                    contents.push(serde_json::json!({
                        "role": "model",
                        "parts": [{ "text": content }],
                    }));
                }
            }
        }

        let mut obj = Map::new();
        obj.insert("contents".to_string(), Value::Array(contents));
        if !system_parts.is_empty() {
            obj.insert(
                "systemInstruction".to_string(),
                serde_json::json!({ "parts": system_parts }),
            );
        }

        let mut generation_config = Map::new();
        if let Some(temp) = options.temperature {
            generation_config.insert("temperature".to_string(), serde_json::json!(temp));
        }
        if let Some(max_tokens) = options.max_tokens {
            generation_config.insert("maxOutputTokens".to_string(), serde_json::json!(max_tokens));
        }
        if options.response_format == Some(ResponseFormat::Json) {
            generation_config.insert(
                "responseMimeType".to_string(),
                Value::from("application/json"),
            );
        }
        if !generation_config.is_empty() {
            obj.insert("generationConfig".to_string(), Value::Object(generation_config));
        }

        Value::Object(obj)
    }
}

#[async_trait]
impl ChatClient for GeminiClient {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        let payload = self.build_generate_request(&request.messages, &request.options);

        tracing::debug!(model = %request.model, json = request.wants_json(), "Gemini generate request");

        let response = self
            .http_client
            .post(self.build_url(&request.model))
            .json(&payload)
            .send()
            .await
            .context("Failed to send request")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Gemini API error ({}): {}", status, error_text);
        }

        let raw: GenerateContentResponse = response
            .json()
            .await
            .context("Failed to parse response")?;

        let candidate = raw.candidates.first();
        let content = candidate.and_then(|c| c.content.as_ref()).map(|c| {
            c.parts
                .iter()
                .filter_map(|p| p.text.as_deref())
                .collect::<String>()
        });

        Ok(ChatResponse {
            content,
            usage: raw.usage_metadata.as_ref().map(|u| TokenUsage {
                input_tokens: u.prompt_token_count,
                output_tokens: u.candidates_token_count,
                total_tokens: u.total_token_count,
            }),
            finish_reason: candidate.and_then(|c| c.finish_reason.clone()),
            raw: serde_json::to_value(&raw)?,
        })
    }

    fn provider_name(&self) -> &str {
        "gemini"
    }
}

/// Builder for GeminiClient
#[derive(Default)]
pub struct GeminiClientBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
}

impl GeminiClientBuilder {
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Override the API base (defaults to the public v1beta endpoint)
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn build(self) -> Result<GeminiClient> {
        let api_key = self.api_key.context("API key is required")?;
        let base_url = self
            .base_url
            .unwrap_or_else(|| GEMINI_API_BASE.to_string())
            .trim_end_matches('/')
            .to_string();

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            "x-goog-api-key",
            HeaderValue::from_str(&api_key).context("Invalid API key format")?,
        );

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(GeminiClient {
            http_client,
            base_url,
        })
    }
}

// ============================================================================
// GEMINI-SPECIFIC RESPONSE TYPES
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<Part>,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
    #[serde(default)]
    pub total_token_count: u32,
}
