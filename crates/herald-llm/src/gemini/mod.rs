mod client;

pub use client::{GeminiClient, GeminiClientBuilder, GEMINI_API_BASE};
