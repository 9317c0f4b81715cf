// Provider configuration and client factory

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::traits::ChatClient;

/// Type of LLM provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    #[default]
    OpenAI,
    Gemini,
}

impl ProviderType {
    /// Environment variable holding this provider's API key
    pub fn api_key_env(&self) -> &'static str {
        match self {
            ProviderType::OpenAI => "OPENAI_API_KEY",
            ProviderType::Gemini => "GEMINI_API_KEY",
        }
    }
}

impl std::str::FromStr for ProviderType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(ProviderType::OpenAI),
            "gemini" | "google" => Ok(ProviderType::Gemini),
            other => anyhow::bail!("Unknown LLM provider: {}", other),
        }
    }
}

/// Configuration for OpenAI provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIConfig {
    pub api_key: String,
    /// Base URL for OpenAI API (optional, defaults to https://api.openai.com/v1)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// Configuration for Gemini provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    pub api_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// Provider-specific configuration details
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProviderDetails {
    OpenAI(OpenAIConfig),
    Gemini(GeminiConfig),
}

/// Complete provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(flatten)]
    pub details: ProviderDetails,
}

impl ProviderConfig {
    /// Create OpenAI provider config
    pub fn openai(api_key: impl Into<String>) -> Self {
        Self {
            details: ProviderDetails::OpenAI(OpenAIConfig {
                api_key: api_key.into(),
                base_url: None,
            }),
        }
    }

    /// Create Gemini provider config
    pub fn gemini(api_key: impl Into<String>) -> Self {
        Self {
            details: ProviderDetails::Gemini(GeminiConfig {
                api_key: api_key.into(),
                base_url: None,
            }),
        }
    }

    /// Build a config for `provider`, with an optional base URL override
    pub fn for_provider(
        provider: ProviderType,
        api_key: impl Into<String>,
        base_url: Option<String>,
    ) -> Self {
        let api_key = api_key.into();
        let details = match provider {
            ProviderType::OpenAI => ProviderDetails::OpenAI(OpenAIConfig { api_key, base_url }),
            ProviderType::Gemini => ProviderDetails::Gemini(GeminiConfig { api_key, base_url }),
        };
        Self { details }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let url = Some(base_url.into());
        match &mut self.details {
            ProviderDetails::OpenAI(c) => c.base_url = url,
            ProviderDetails::Gemini(c) => c.base_url = url,
        }
        self
    }

    /// Get the provider type
    pub fn provider_type(&self) -> ProviderType {
        match self.details {
            ProviderDetails::OpenAI(_) => ProviderType::OpenAI,
            ProviderDetails::Gemini(_) => ProviderType::Gemini,
        }
    }
}

/// Factory for creating LLM clients from configuration
pub struct ClientFactory;

impl ClientFactory {
    /// Create a chat client from provider configuration
    pub fn create_client(config: ProviderConfig) -> Result<Arc<dyn ChatClient>> {
        match config.details {
            ProviderDetails::OpenAI(openai_config) => {
                let mut client = crate::openai::OpenAIClient::new(openai_config.api_key)?;
                if let Some(base_url) = openai_config.base_url {
                    client = client.with_base_url(base_url);
                }
                Ok(Arc::new(client))
            }
            ProviderDetails::Gemini(gemini_config) => {
                let mut builder = crate::gemini::GeminiClient::builder()
                    .api_key(gemini_config.api_key);
                if let Some(base_url) = gemini_config.base_url {
                    builder = builder.base_url(base_url);
                }
                Ok(Arc::new(builder.build()?))
            }
        }
    }
}
