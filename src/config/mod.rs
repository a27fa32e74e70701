//! Application configuration
//!
//! Loaded from `config/default`, `config/local`, then `APP__`-prefixed
//! environment variables (e.g. `APP__SERVER__PORT=9000`). API keys are read
//! straight from the environment, not from config files.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub rag: RagConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    /// Groq model used for chat and itinerary generation
    pub model: String,
    /// Per-request timeout in seconds for outbound HTTP calls
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RagConfig {
    /// Directory for the persisted vector index
    pub index_dir: String,
    /// Optional directory of PDFs ingested at startup
    pub pdf_dir: Option<String>,
    /// Default number of neighbors retrieved per query
    pub top_k: usize,
    /// Remote embedding endpoint; the local hashing embedder is used when
    /// this is unset
    pub embedding_url: Option<String>,
    pub embedding_model: String,
    pub embedding_dimensions: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// TTL for cached travel data lookups, in seconds
    pub ttl_seconds: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "llama-3.3-70b-versatile".to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            index_dir: "data/index".to_string(),
            pdf_dir: None,
            top_k: 5,
            embedding_url: None,
            embedding_model: "nomic-embed-text".to_string(),
            embedding_dimensions: 384,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { ttl_seconds: 600 }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
