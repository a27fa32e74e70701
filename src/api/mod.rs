//! HTTP API layer

pub mod error;
pub mod health;
pub mod router;
pub mod routes;
pub mod state;
pub mod types;

pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
