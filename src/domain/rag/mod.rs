//! Retrieval-augmented generation: documents, vector index, and engine

pub mod chunker;
pub mod corpus;
pub mod document;
pub mod engine;
pub mod index;

pub use document::{DocumentMetadata, DocumentRecord, IndexedDocument};
pub use engine::{RagEngine, SearchOptions, NO_DOCUMENTS_SENTINEL, NO_RELEVANT_SENTINEL};
pub use index::{IndexStore, VectorIndex};
