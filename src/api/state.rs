use std::sync::Arc;

use crate::domain::agent::TravelAgent;

/// Shared state for all HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub agent: Arc<TravelAgent>,
}

impl AppState {
    pub fn new(agent: Arc<TravelAgent>) -> Self {
        Self { agent }
    }
}
