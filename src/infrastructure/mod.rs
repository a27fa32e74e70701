//! Infrastructure layer: concrete providers and adapters

pub mod cache;
pub mod embedding;
pub mod http_client;
pub mod llm;
pub mod logging;
pub mod pdf;
pub mod travel;
