//! PDF directory ingestion for the RAG index
//!
//! Extracts text from every PDF in a directory, chunks it, and appends the
//! chunks to the engine. Individual files that fail extraction are skipped
//! so one corrupt download cannot block the rest of the corpus.

use std::path::Path;

use tracing::{info, warn};

use crate::domain::rag::chunker::chunk_text;
use crate::domain::rag::{DocumentMetadata, IndexedDocument, RagEngine};
use crate::domain::DomainError;

/// Limits applied during directory ingestion
#[derive(Debug, Clone)]
pub struct IngestOptions {
    pub max_files: usize,
    pub max_chunks_per_file: usize,
    pub chunk_size: usize,
    pub max_file_size_mb: u64,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            max_files: 20,
            max_chunks_per_file: 200,
            chunk_size: 1200,
            max_file_size_mb: 25,
        }
    }
}

/// Ingest all PDFs under `dir`, returning the number of chunks added
pub async fn ingest_dir(
    engine: &RagEngine,
    dir: &Path,
    options: &IngestOptions,
) -> Result<usize, DomainError> {
    if !dir.is_dir() {
        return Err(DomainError::validation(format!(
            "Not a directory: {}",
            dir.display()
        )));
    }

    let entries = std::fs::read_dir(dir)
        .map_err(|e| DomainError::internal(format!("Failed to read {}: {}", dir.display(), e)))?;

    let mut pdf_paths: Vec<_> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
        })
        .collect();
    pdf_paths.sort();

    let mut total_chunks = 0;
    for path in pdf_paths.into_iter().take(options.max_files) {
        match extract_chunks(&path, options) {
            Ok(documents) if !documents.is_empty() => {
                let added = engine.append_documents(documents).await?;
                info!(file = %path.display(), chunks = added, "Ingested PDF");
                total_chunks += added;
            }
            Ok(_) => {
                warn!(file = %path.display(), "PDF contained no extractable text");
            }
            Err(e) => {
                warn!(file = %path.display(), error = %e, "Skipping PDF");
            }
        }
    }

    Ok(total_chunks)
}

fn extract_chunks(path: &Path, options: &IngestOptions) -> Result<Vec<IndexedDocument>, String> {
    let size = std::fs::metadata(path).map_err(|e| e.to_string())?.len();
    if size > options.max_file_size_mb * 1024 * 1024 {
        return Err(format!("File exceeds {} MB limit", options.max_file_size_mb));
    }

    let text = pdf_extract::extract_text(path).map_err(|e| e.to_string())?;

    let title = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("document.pdf")
        .to_string();

    Ok(chunk_text(&text, options.chunk_size)
        .into_iter()
        .take(options.max_chunks_per_file)
        .map(|chunk| IndexedDocument::new(chunk, DocumentMetadata::titled(title.clone())))
        .collect())
}
