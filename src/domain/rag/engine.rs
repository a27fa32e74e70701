//! RAG retrieval engine
//!
//! Owns the embedder and the vector index. Loads are whole-index replacement
//! (plus an additive append path for chunked ingestion); every load persists
//! the index so restarts rehydrate from disk.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::document::{DocumentMetadata, DocumentRecord, IndexedDocument};
use super::index::{IndexStore, VectorIndex};
use crate::domain::embedding::EmbeddingProvider;
use crate::domain::llm::{LlmProvider, LlmRequest};
use crate::domain::DomainError;

/// Returned when the index holds no documents at all
pub const NO_DOCUMENTS_SENTINEL: &str = "[RAG] No documents available.";

/// Returned when retrieval found candidates but the filter removed them all
pub const NO_RELEVANT_SENTINEL: &str = "[RAG] No relevant documents.";

/// Options for a single search call
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Number of nearest neighbors to retrieve before filtering
    pub top_k: usize,
    /// Case-insensitive substring match against document state + title.
    /// Applied after retrieval, so a restrictive filter can return fewer
    /// than `top_k` even when closer matches exist outside the filter.
    pub state: Option<String>,
    /// Ask the LLM for a bullet-point summary of the retrieved context
    pub summarize: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            top_k: 5,
            state: None,
            summarize: false,
        }
    }
}

impl SearchOptions {
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    pub fn with_summarize(mut self, summarize: bool) -> Self {
        self.summarize = summarize;
        self
    }
}

struct IndexState {
    index: VectorIndex,
    documents: Vec<IndexedDocument>,
}

/// Retrieval engine composing an embedder, a vector index, and an optional
/// LLM summarizer
pub struct RagEngine {
    embedder: Arc<dyn EmbeddingProvider>,
    store: IndexStore,
    state: RwLock<IndexState>,
    summarizer: Option<(Arc<dyn LlmProvider>, String)>,
}

impl std::fmt::Debug for RagEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RagEngine")
            .field("embedder", &self.embedder.provider_name())
            .finish_non_exhaustive()
    }
}

impl RagEngine {
    /// Create an engine, rehydrating any usable persisted index
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, store: IndexStore) -> Self {
        let dimensions = embedder.dimensions();

        let state = match store.load(dimensions) {
            Some((index, documents)) => {
                info!(documents = documents.len(), "Rehydrated RAG index from disk");
                IndexState { index, documents }
            }
            None => IndexState {
                index: VectorIndex::new(dimensions),
                documents: Vec::new(),
            },
        };

        Self {
            embedder,
            store,
            state: RwLock::new(state),
            summarizer: None,
        }
    }

    /// Attach an LLM used for optional result summarization
    pub fn with_summarizer(mut self, llm: Arc<dyn LlmProvider>, model: impl Into<String>) -> Self {
        self.summarizer = Some((llm, model.into()));
        self
    }

    pub async fn document_count(&self) -> usize {
        self.state.read().await.documents.len()
    }

    /// Replace the whole index with titled documents (title -> text)
    pub async fn load_titled<I, T>(&self, docs: I) -> Result<usize, DomainError>
    where
        I: IntoIterator<Item = (T, T)>,
        T: Into<String>,
    {
        let documents = docs
            .into_iter()
            .map(|(title, text)| IndexedDocument::new(text, DocumentMetadata::titled(title)))
            .collect();
        self.replace(documents).await
    }

    /// Replace the whole index with structured records
    pub async fn load_records(&self, records: Vec<DocumentRecord>) -> Result<usize, DomainError> {
        let documents = records
            .into_iter()
            .map(|r| {
                let mut metadata = DocumentMetadata::titled(r.title);
                if let Some(state) = r.state.filter(|s| !s.is_empty()) {
                    metadata = metadata.with_state(state);
                }
                IndexedDocument::new(r.content, metadata)
            })
            .collect();
        self.replace(documents).await
    }

    /// Replace the whole index with untitled text chunks
    pub async fn load_texts(&self, texts: Vec<String>) -> Result<usize, DomainError> {
        let documents = texts
            .into_iter()
            .map(|text| IndexedDocument::new(text, DocumentMetadata::titled("TravelDoc")))
            .collect();
        self.replace(documents).await
    }

    /// Add documents on top of the current index (used by chunked ingestion).
    /// Persists afterwards, like every other load path.
    pub async fn append_documents(
        &self,
        documents: Vec<IndexedDocument>,
    ) -> Result<usize, DomainError> {
        let documents = non_blank(documents);
        if documents.is_empty() {
            return Ok(0);
        }

        let embeddings = self.embed_documents(&documents).await?;

        let mut state = self.state.write().await;
        for embedding in embeddings {
            state.index.add(embedding)?;
        }
        state.documents.extend(documents.clone());

        self.store.save(&state.index, &state.documents)?;
        debug!(added = documents.len(), total = state.documents.len(), "Appended documents");
        Ok(documents.len())
    }

    async fn replace(&self, documents: Vec<IndexedDocument>) -> Result<usize, DomainError> {
        let documents = non_blank(documents);
        let embeddings = self.embed_documents(&documents).await?;

        let mut state = self.state.write().await;
        state.index.reset();
        state.documents.clear();

        for embedding in embeddings {
            state.index.add(embedding)?;
        }
        state.documents = documents;

        self.store.save(&state.index, &state.documents)?;
        info!(documents = state.documents.len(), "Loaded RAG index");
        Ok(state.documents.len())
    }

    async fn embed_documents(
        &self,
        documents: &[IndexedDocument],
    ) -> Result<Vec<Vec<f32>>, DomainError> {
        if documents.is_empty() {
            return Ok(Vec::new());
        }
        let texts: Vec<String> = documents.iter().map(|d| d.text.clone()).collect();
        self.embedder.embed(&texts).await
    }

    /// Retrieve context for a query.
    ///
    /// Returns the concatenated text of matching documents, a summarized form
    /// when requested, or one of the sentinel strings.
    pub async fn search(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<String, DomainError> {
        let state = self.state.read().await;

        if state.index.is_empty() {
            return Ok(NO_DOCUMENTS_SENTINEL.to_string());
        }

        let query_vec = self
            .embedder
            .embed(std::slice::from_ref(&query.to_string()))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::internal("Embedder returned no vector for query"))?;

        let hits = state.index.search(&query_vec, options.top_k);

        let state_filter = options.state.as_deref().map(str::to_lowercase);
        let mut results: Vec<&str> = Vec::new();

        for (id, _score) in hits {
            let Some(doc) = state.documents.get(id) else {
                continue;
            };
            if let Some(ref filter) = state_filter {
                if !doc.metadata.filter_text().contains(filter.as_str()) {
                    continue;
                }
            }
            results.push(&doc.text);
        }

        if results.is_empty() {
            return Ok(NO_RELEVANT_SENTINEL.to_string());
        }

        let context = results.join("\n");
        drop(state);

        if !options.summarize {
            return Ok(context);
        }

        Ok(self.summarize(&context).await)
    }

    /// Summarization is best-effort: any LLM failure degrades to the raw
    /// context instead of surfacing an error to the caller.
    async fn summarize(&self, context: &str) -> String {
        let Some((llm, model)) = &self.summarizer else {
            return context.to_string();
        };

        let prompt = format!(
            "Summarize the following travel information into concise bullet \
             points. Focus on attractions, tips, logistics, safety, and best \
             times to visit.\n\n{}",
            context
        );
        let request = LlmRequest::builder().user(prompt).temperature(0.4).build();

        match llm.chat(model, request).await {
            Ok(response) => response
                .content()
                .map(|c| c.trim().to_string())
                .unwrap_or_else(|| context.to_string()),
            Err(e) => {
                warn!(error = %e, "Summarization failed, returning raw context");
                context.to_string()
            }
        }
    }
}

fn non_blank(documents: Vec<IndexedDocument>) -> Vec<IndexedDocument> {
    documents
        .into_iter()
        .filter(|d| !d.text.trim().is_empty())
        .map(|mut d| {
            d.text = d.text.trim().to_string();
            d
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::llm::mock::MockLlmProvider;
    use crate::infrastructure::embedding::HashingEmbedder;

    fn engine_in(dir: &std::path::Path) -> RagEngine {
        RagEngine::new(
            Arc::new(HashingEmbedder::default()),
            IndexStore::new(dir.to_path_buf()),
        )
    }

    fn goa_rajasthan() -> Vec<(&'static str, &'static str)> {
        vec![
            (
                "Goa",
                "Goa is famous for beaches, nightlife, and seafood. Popular \
                 beaches include Baga and Palolem.",
            ),
            (
                "Rajasthan",
                "Rajasthan is known for its desert climate, forts, and \
                 palaces. Summers are extremely hot.",
            ),
        ]
    }

    #[tokio::test]
    async fn test_empty_index_sentinel() {
        let dir = tempfile::tempdir().unwrap();
        let engine = engine_in(dir.path());

        let result = engine.search("beaches", &SearchOptions::default()).await.unwrap();
        assert_eq!(result, NO_DOCUMENTS_SENTINEL);
    }

    #[tokio::test]
    async fn test_retrieval_self_consistency() {
        let dir = tempfile::tempdir().unwrap();
        let engine = engine_in(dir.path());
        engine.load_titled(goa_rajasthan()).await.unwrap();

        for (_, text) in goa_rajasthan() {
            let result = engine.search(text, &SearchOptions::default()).await.unwrap();
            assert!(
                result.contains(text),
                "document should retrieve itself for query {:?}",
                text
            );
        }
    }

    #[tokio::test]
    async fn test_search_by_topic() {
        let dir = tempfile::tempdir().unwrap();
        let engine = engine_in(dir.path());
        engine.load_titled(goa_rajasthan()).await.unwrap();

        let result = engine
            .search("beach", &SearchOptions::default().with_top_k(1))
            .await
            .unwrap();
        assert!(result.contains("beaches"));
        assert!(!result.contains("desert"));

        let result = engine
            .search("desert", &SearchOptions::default().with_top_k(1))
            .await
            .unwrap();
        assert!(result.contains("desert"));
    }

    #[tokio::test]
    async fn test_load_replaces_previous_index() {
        let dir = tempfile::tempdir().unwrap();
        let engine = engine_in(dir.path());

        engine.load_titled(goa_rajasthan()).await.unwrap();
        engine
            .load_titled(vec![("Kerala", "Kerala has backwaters and hill stations.")])
            .await
            .unwrap();

        assert_eq!(engine.document_count().await, 1);

        let result = engine
            .search("beaches nightlife seafood", &SearchOptions::default())
            .await
            .unwrap();
        assert!(!result.contains("beaches, nightlife"));
        assert!(result.contains("backwaters"));
    }

    #[tokio::test]
    async fn test_load_texts_replaces_with_default_title() {
        let dir = tempfile::tempdir().unwrap();
        let engine = engine_in(dir.path());
        engine.load_titled(goa_rajasthan()).await.unwrap();

        engine
            .load_texts(vec![
                "Kerala backwaters are best explored by houseboat.".to_string(),
            ])
            .await
            .unwrap();

        assert_eq!(engine.document_count().await, 1);

        // untitled chunks fall under the default title, which the filter sees
        let result = engine
            .search(
                "houseboat backwaters",
                &SearchOptions::default().with_state("traveldoc"),
            )
            .await
            .unwrap();
        assert!(result.contains("houseboat"));

        let result = engine
            .search("desert forts", &SearchOptions::default())
            .await
            .unwrap();
        assert!(!result.contains("desert"));
    }

    #[tokio::test]
    async fn test_state_filter_no_match_sentinel() {
        let dir = tempfile::tempdir().unwrap();
        let engine = engine_in(dir.path());
        engine.load_titled(goa_rajasthan()).await.unwrap();

        let result = engine
            .search(
                "desert",
                &SearchOptions::default().with_state("Himachal Pradesh"),
            )
            .await
            .unwrap();
        assert_eq!(result, NO_RELEVANT_SENTINEL);
    }

    #[tokio::test]
    async fn test_state_filter_matches_title() {
        let dir = tempfile::tempdir().unwrap();
        let engine = engine_in(dir.path());
        engine.load_titled(goa_rajasthan()).await.unwrap();

        let result = engine
            .search("desert forts", &SearchOptions::default().with_state("rajasthan"))
            .await
            .unwrap();
        assert!(result.contains("desert"));
    }

    #[tokio::test]
    async fn test_records_carry_state_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let engine = engine_in(dir.path());

        engine
            .load_records(vec![DocumentRecord {
                title: "Backwaters".into(),
                state: Some("Kerala".into()),
                content: "Houseboat cruises through palm-lined canals.".into(),
            }])
            .await
            .unwrap();

        let result = engine
            .search("houseboat", &SearchOptions::default().with_state("kerala"))
            .await
            .unwrap();
        assert!(result.contains("Houseboat"));
    }

    #[tokio::test]
    async fn test_blank_documents_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let engine = engine_in(dir.path());

        engine
            .load_titled(vec![("Empty", "   \n  "), ("Real", "Actual content here.")])
            .await
            .unwrap();
        assert_eq!(engine.document_count().await, 1);
    }

    #[tokio::test]
    async fn test_summarize_uses_llm() {
        let dir = tempfile::tempdir().unwrap();
        let llm = Arc::new(MockLlmProvider::new("mock").with_response("- beaches\n- forts"));
        let engine = engine_in(dir.path()).with_summarizer(llm, "mock-model");
        engine.load_titled(goa_rajasthan()).await.unwrap();

        let result = engine
            .search("beach", &SearchOptions::default().with_summarize(true))
            .await
            .unwrap();
        assert_eq!(result, "- beaches\n- forts");
    }

    #[tokio::test]
    async fn test_summarize_failure_falls_back_to_context() {
        let dir = tempfile::tempdir().unwrap();
        let llm = Arc::new(MockLlmProvider::new("mock").with_error("model overloaded"));
        let engine = engine_in(dir.path()).with_summarizer(llm, "mock-model");
        engine.load_titled(goa_rajasthan()).await.unwrap();

        let result = engine
            .search(
                "beach",
                &SearchOptions::default().with_top_k(1).with_summarize(true),
            )
            .await
            .unwrap();
        assert!(result.contains("beaches"));
    }

    #[tokio::test]
    async fn test_persistence_across_restart() {
        let dir = tempfile::tempdir().unwrap();
        {
            let engine = engine_in(dir.path());
            engine.load_titled(goa_rajasthan()).await.unwrap();
        }

        let engine = engine_in(dir.path());
        assert_eq!(engine.document_count().await, 2);

        let result = engine
            .search("beach", &SearchOptions::default().with_top_k(1))
            .await
            .unwrap();
        assert!(result.contains("beaches"));
    }

    #[tokio::test]
    async fn test_append_keeps_existing_documents() {
        let dir = tempfile::tempdir().unwrap();
        let engine = engine_in(dir.path());
        engine.load_titled(goa_rajasthan()).await.unwrap();

        let added = engine
            .append_documents(vec![IndexedDocument::new(
                "Manali has mountain treks and snow.",
                DocumentMetadata::titled("guide.pdf"),
            )])
            .await
            .unwrap();

        assert_eq!(added, 1);
        assert_eq!(engine.document_count().await, 3);
    }
}
