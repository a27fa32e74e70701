//! Exact inner-product vector index with file persistence
//!
//! Vectors are stored parallel to the engine's metadata list; insertion order
//! defines the implicit integer id used for retrieval.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::document::IndexedDocument;
use crate::domain::DomainError;

const VECTORS_FILE: &str = "vectors.json";
const METADATA_FILE: &str = "metadata.json";

/// On-disk representation of the vector side of the index
#[derive(Debug, Serialize, Deserialize)]
struct PersistedVectors {
    dimensions: usize,
    vectors: Vec<Vec<f32>>,
}

/// In-memory flat vector index with exact top-k search by inner product
#[derive(Debug)]
pub struct VectorIndex {
    dimensions: usize,
    vectors: Vec<Vec<f32>>,
}

impl VectorIndex {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            vectors: Vec::new(),
        }
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Append a vector; its id is the current index size
    pub fn add(&mut self, vector: Vec<f32>) -> Result<usize, DomainError> {
        if vector.len() != self.dimensions {
            return Err(DomainError::index(format!(
                "Vector dimension {} does not match index dimension {}",
                vector.len(),
                self.dimensions
            )));
        }
        self.vectors.push(vector);
        Ok(self.vectors.len() - 1)
    }

    /// Drop all vectors
    pub fn reset(&mut self) {
        self.vectors.clear();
    }

    /// Exact top-k search by inner product, highest score first
    pub fn search(&self, query: &[f32], top_k: usize) -> Vec<(usize, f32)> {
        if query.len() != self.dimensions || top_k == 0 {
            return Vec::new();
        }

        let mut scored: Vec<(usize, f32)> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(id, v)| (id, inner_product(query, v)))
            .collect();

        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);
        scored
    }
}

fn inner_product(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Persists and rehydrates index vectors + document metadata as a file pair.
///
/// The file format is a private implementation detail. A missing, corrupt, or
/// dimension-mismatched pair is treated as an empty index so startup never
/// fails on bad persisted state.
#[derive(Debug, Clone)]
pub struct IndexStore {
    dir: PathBuf,
}

impl IndexStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn vectors_path(&self) -> PathBuf {
        self.dir.join(VECTORS_FILE)
    }

    fn metadata_path(&self) -> PathBuf {
        self.dir.join(METADATA_FILE)
    }

    /// Write both files. Called after every load so restarts see the latest
    /// index.
    pub fn save(
        &self,
        index: &VectorIndex,
        documents: &[IndexedDocument],
    ) -> Result<(), DomainError> {
        fs::create_dir_all(&self.dir)
            .map_err(|e| DomainError::index(format!("Failed to create index dir: {}", e)))?;

        let persisted = PersistedVectors {
            dimensions: index.dimensions,
            vectors: index.vectors.clone(),
        };

        write_json(&self.vectors_path(), &persisted)?;
        write_json(&self.metadata_path(), &documents)?;
        Ok(())
    }

    /// Load a previously saved index. Returns `None` when there is nothing
    /// usable on disk (absent, corrupt, wrong dimension, or out of sync).
    pub fn load(&self, expected_dimensions: usize) -> Option<(VectorIndex, Vec<IndexedDocument>)> {
        let vectors_path = self.vectors_path();
        let metadata_path = self.metadata_path();

        if !vectors_path.exists() || !metadata_path.exists() {
            return None;
        }

        let persisted: PersistedVectors = match read_json(&vectors_path) {
            Ok(v) => v,
            Err(e) => {
                warn!(path = %vectors_path.display(), error = %e, "Discarding unreadable index");
                return None;
            }
        };

        let documents: Vec<IndexedDocument> = match read_json(&metadata_path) {
            Ok(d) => d,
            Err(e) => {
                warn!(path = %metadata_path.display(), error = %e, "Discarding unreadable metadata");
                return None;
            }
        };

        if persisted.dimensions != expected_dimensions
            || persisted.vectors.len() != documents.len()
            || persisted
                .vectors
                .iter()
                .any(|v| v.len() != persisted.dimensions)
        {
            warn!(
                dir = %self.dir.display(),
                "Persisted index inconsistent with current embedder, starting empty"
            );
            return None;
        }

        let index = VectorIndex {
            dimensions: persisted.dimensions,
            vectors: persisted.vectors,
        };
        Some((index, documents))
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), DomainError> {
    let json = serde_json::to_string(value)
        .map_err(|e| DomainError::index(format!("Failed to serialize index: {}", e)))?;
    fs::write(path, json)
        .map_err(|e| DomainError::index(format!("Failed to write {}: {}", path.display(), e)))
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, DomainError> {
    let raw = fs::read_to_string(path)
        .map_err(|e| DomainError::index(format!("Failed to read {}: {}", path.display(), e)))?;
    serde_json::from_str(&raw)
        .map_err(|e| DomainError::index(format!("Failed to parse {}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::rag::document::DocumentMetadata;

    fn unit(x: f32, y: f32) -> Vec<f32> {
        let mut v = vec![x, y];
        crate::domain::embedding::normalize(&mut v);
        v
    }

    #[test]
    fn test_add_and_search_ordering() {
        let mut index = VectorIndex::new(2);
        index.add(unit(1.0, 0.0)).unwrap();
        index.add(unit(0.0, 1.0)).unwrap();
        index.add(unit(1.0, 1.0)).unwrap();

        let results = index.search(&unit(1.0, 0.0), 3);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].0, 0);
        assert!(results[0].1 > results[1].1);
    }

    #[test]
    fn test_search_truncates_to_top_k() {
        let mut index = VectorIndex::new(2);
        for _ in 0..10 {
            index.add(unit(1.0, 0.5)).unwrap();
        }
        assert_eq!(index.search(&unit(1.0, 0.0), 3).len(), 3);
    }

    #[test]
    fn test_dimension_mismatch_rejected() {
        let mut index = VectorIndex::new(3);
        assert!(index.add(vec![1.0, 0.0]).is_err());
        assert!(index.search(&[1.0, 0.0], 5).is_empty());
    }

    #[test]
    fn test_reset_clears_vectors() {
        let mut index = VectorIndex::new(2);
        index.add(unit(1.0, 0.0)).unwrap();
        index.reset();
        assert!(index.is_empty());
    }

    #[test]
    fn test_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = IndexStore::new(dir.path());

        let mut index = VectorIndex::new(2);
        index.add(unit(1.0, 0.0)).unwrap();
        index.add(unit(0.0, 1.0)).unwrap();
        let documents = vec![
            IndexedDocument::new("beaches", DocumentMetadata::titled("Goa")),
            IndexedDocument::new("deserts", DocumentMetadata::titled("Rajasthan")),
        ];

        store.save(&index, &documents).unwrap();

        let (loaded, loaded_docs) = store.load(2).expect("index should load");
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded_docs, documents);
    }

    #[test]
    fn test_load_missing_dir_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = IndexStore::new(dir.path().join("nothing-here"));
        assert!(store.load(2).is_none());
    }

    #[test]
    fn test_load_corrupt_files_is_none() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(VECTORS_FILE), "not json").unwrap();
        std::fs::write(dir.path().join(METADATA_FILE), "[]").unwrap();

        let store = IndexStore::new(dir.path());
        assert!(store.load(2).is_none());
    }

    #[test]
    fn test_load_dimension_mismatch_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = IndexStore::new(dir.path());

        let mut index = VectorIndex::new(2);
        index.add(unit(1.0, 0.0)).unwrap();
        let documents = vec![IndexedDocument::new(
            "text",
            DocumentMetadata::titled("Doc"),
        )];
        store.save(&index, &documents).unwrap();

        assert!(store.load(3).is_none());
    }

    #[test]
    fn test_load_out_of_sync_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = IndexStore::new(dir.path());

        let mut index = VectorIndex::new(2);
        index.add(unit(1.0, 0.0)).unwrap();
        store.save(&index, &[]).unwrap();

        assert!(store.load(2).is_none());
    }
}
