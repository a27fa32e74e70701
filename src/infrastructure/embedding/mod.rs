//! Embedding provider implementations

pub mod hashing;
pub mod http;

pub use hashing::HashingEmbedder;
pub use http::HttpEmbeddingProvider;
