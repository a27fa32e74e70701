//! Domain layer: core types, traits, and orchestration logic

pub mod agent;
pub mod cache;
pub mod embedding;
pub mod error;
pub mod llm;
pub mod rag;
pub mod router;
pub mod travel;

pub use error::DomainError;
