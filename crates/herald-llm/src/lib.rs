pub mod types;
pub mod traits;
pub mod config;
pub mod openai;
pub mod gemini;

pub use traits::{
    ChatClient,
    ChatRequest, ChatResponse, ChatOptions,
    ResponseFormat,
    TokenUsage,
};

pub use config::{ClientFactory, ProviderConfig, ProviderType};
pub use openai::OpenAIClient;
pub use gemini::GeminiClient;
pub use types::{Message, Role};
