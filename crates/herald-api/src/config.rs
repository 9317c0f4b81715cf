use config::{Config as ConfigLoader, ConfigBuilder, ConfigError, File};
use config::builder::DefaultState;
use herald_llm::{ProviderConfig, ProviderType};
use herald_rag::RagConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub llm: LlmConfig,
    pub storage: StorageConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub ingestion: IngestionConfig,
    pub logging: LoggingConfig,

    // Secret (from ENV only)
    #[serde(default)]
    pub api_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_request_timeout() -> u64 {
    120
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    pub enabled: bool,
    pub origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    #[serde(default)]
    pub provider: ProviderType,
    pub model: String,
    #[serde(default)]
    pub temperature: Option<f32>,
    #[serde(default)]
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    File,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    #[serde(default = "default_storage_path")]
    pub path: PathBuf,
}

fn default_storage_path() -> PathBuf {
    PathBuf::from("data")
}

#[derive(Debug, Clone, Deserialize)]
pub struct RetrievalConfig {
    pub max_sources: usize,
    pub history_turns: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        let rag = RagConfig::default();
        Self {
            max_sources: rag.max_sources,
            history_turns: rag.history_turns,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct IngestionConfig {
    pub batch_size: usize,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            batch_size: RagConfig::default().batch_size,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

/// Environment variables that override single config keys
const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("SERVER_HOST", "server.host"),
    ("SERVER_PORT", "server.port"),
    ("SERVER_REQUEST_TIMEOUT_SECS", "server.request_timeout_secs"),
    ("LLM_PROVIDER", "llm.provider"),
    ("LLM_MODEL", "llm.model"),
    ("LLM_TEMPERATURE", "llm.temperature"),
    ("LLM_BASE_URL", "llm.base_url"),
    ("STORAGE_BACKEND", "storage.backend"),
    ("STORAGE_PATH", "storage.path"),
    ("RETRIEVAL_MAX_SOURCES", "retrieval.max_sources"),
    ("RETRIEVAL_HISTORY_TURNS", "retrieval.history_turns"),
    ("INGESTION_BATCH_SIZE", "ingestion.batch_size"),
    ("LOG_LEVEL", "logging.level"),
    ("LOG_FORMAT", "logging.format"),
];

impl Config {
    /// Load configuration from TOML files and environment variables
    ///
    /// Hierarchy (weakest to strongest):
    /// 1. config/default.toml
    /// 2. config/{ENV}.toml (if ENV is set)
    /// 3. Environment variables (SERVER_, LLM_, STORAGE_, RETRIEVAL_, INGESTION_, LOG_)
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("ENV").unwrap_or_else(|_| "dev".to_string());

        let builder = ConfigLoader::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false));
        let builder = apply_env_overrides(builder)?;

        let mut cfg: Config = builder.build()?.try_deserialize()?;

        // Load the provider secret from ENV (not in TOML)
        let key_var = cfg.llm.provider.api_key_env();
        cfg.api_key = std::env::var(key_var).map_err(|_| {
            ConfigError::Message(format!("{} environment variable is required", key_var))
        })?;

        Ok(cfg)
    }

    /// Load config from a specific path (useful for testing)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let builder = ConfigLoader::builder().add_source(File::from(path.as_ref()));

        let config = builder.build()?;
        config.try_deserialize()
    }

    pub fn rag_config(&self) -> RagConfig {
        RagConfig {
            model: self.llm.model.clone(),
            temperature: self.llm.temperature,
            max_sources: self.retrieval.max_sources,
            history_turns: self.retrieval.history_turns,
            batch_size: self.ingestion.batch_size,
        }
    }

    pub fn provider_config(&self) -> ProviderConfig {
        ProviderConfig::for_provider(
            self.llm.provider,
            self.api_key.clone(),
            self.llm.base_url.clone(),
        )
    }
}

fn apply_env_overrides(
    mut builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    for (var, key) in ENV_OVERRIDES {
        builder = builder.set_override_option(*key, std::env::var(var).ok())?;
    }
    Ok(builder)
}
