//! Travel planning assistant: RAG retrieval, tool routing, and LLM-backed
//! itinerary generation for trips within India.

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::api::AppState;
use crate::config::AppConfig;
use crate::domain::agent::{TravelAgent, TravelToolset};
use crate::domain::embedding::EmbeddingProvider;
use crate::domain::rag::{corpus, IndexStore, RagEngine};
use crate::infrastructure::cache::InMemoryCache;
use crate::infrastructure::embedding::{HashingEmbedder, HttpEmbeddingProvider};
use crate::infrastructure::http_client::HttpClient;
use crate::infrastructure::llm::GroqProvider;
use crate::infrastructure::pdf::{self, IngestOptions};
use crate::infrastructure::travel::{
    OpenWeatherProvider, SerpFlightsProvider, SerpHotelsProvider, SerpMapsProvider,
    SerpPlacesProvider, SerpWebSearchProvider,
};

/// Wire the whole application together.
///
/// A missing `GROQ_API_KEY` is fatal. The travel data keys are optional;
/// providers without one fail per call and the agent degrades gracefully.
pub async fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let groq_key = env_var("GROQ_API_KEY")
        .ok_or_else(|| anyhow::anyhow!("GROQ_API_KEY must be set"))?;
    let serpapi_key = env_var("SERPAPI_KEY");
    let openweather_key = env_var("OPENWEATHER_API_KEY");

    if serpapi_key.is_none() {
        warn!("SERPAPI_KEY is not set; flight, hotel, and search lookups will be unavailable");
    }
    if openweather_key.is_none() {
        warn!("OPENWEATHER_API_KEY is not set; weather lookups will be unavailable");
    }

    let timeout = Duration::from_secs(config.llm.request_timeout_secs);
    let http = HttpClient::with_timeout(timeout)?;

    let llm = Arc::new(GroqProvider::new(http.clone(), groq_key));
    let model = config.llm.model.clone();

    let embedder: Arc<dyn EmbeddingProvider> = match &config.rag.embedding_url {
        Some(url) => {
            let mut provider = HttpEmbeddingProvider::new(
                http.clone(),
                url.clone(),
                config.rag.embedding_model.clone(),
                config.rag.embedding_dimensions,
            );
            if let Some(key) = env_var("EMBEDDING_API_KEY") {
                provider = provider.with_api_key(key);
            }
            Arc::new(provider)
        }
        None => Arc::new(HashingEmbedder::new(config.rag.embedding_dimensions)),
    };

    let store = IndexStore::new(PathBuf::from(&config.rag.index_dir));
    let rag = Arc::new(RagEngine::new(embedder, store).with_summarizer(llm.clone(), model.clone()));

    if rag.document_count().await == 0 {
        let loaded = rag.load_titled(corpus::india_travel_docs()).await?;
        info!(documents = loaded, "Seeded knowledge base with built-in corpus");
    }

    if let Some(pdf_dir) = &config.rag.pdf_dir {
        match pdf::ingest_dir(&rag, Path::new(pdf_dir), &IngestOptions::default()).await {
            Ok(chunks) => info!(chunks, dir = %pdf_dir, "Ingested PDF directory"),
            Err(e) => warn!(dir = %pdf_dir, error = %e, "PDF ingestion failed"),
        }
    }

    let tools = TravelToolset {
        weather: Arc::new(OpenWeatherProvider::new(http.clone(), openweather_key)),
        flights: Arc::new(SerpFlightsProvider::new(http.clone(), serpapi_key.clone())),
        hotels: Arc::new(SerpHotelsProvider::new(http.clone(), serpapi_key.clone())),
        places: Arc::new(SerpPlacesProvider::new(http.clone(), serpapi_key.clone())),
        maps: Arc::new(SerpMapsProvider::new(http.clone(), serpapi_key.clone())),
        web_search: Arc::new(SerpWebSearchProvider::new(http, serpapi_key)),
    };

    let cache = Arc::new(InMemoryCache::new());
    let agent = TravelAgent::new(llm, model, rag, tools, cache)
        .with_cache_ttl(Duration::from_secs(config.cache.ttl_seconds))
        .with_top_k(config.rag.top_k);

    Ok(AppState::new(Arc::new(agent)))
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
