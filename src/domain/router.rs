//! Keyword-based tool router
//!
//! Decides which tools a free-text query needs. Intent detection is a pure
//! function; `run_tools` performs the side-effecting calls and stringifies
//! failures so a single tool error never aborts the combined result. RAG is
//! executed by the agent, not here.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

use crate::domain::travel::{WeatherProvider, WebSearchProvider};

static CITY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"in\s+([a-zA-Z][a-zA-Z\s]*)").expect("city regex is valid")
});

const WEATHER_KEYWORDS: &[&str] = &["weather", "temperature", "climate"];
const SEARCH_KEYWORDS: &[&str] = &["top places", "best places", "things to do"];
const PLANNING_KEYWORDS: &[&str] = &["plan", "itinerary", "trip"];
const RAG_KEYWORDS: &[&str] = &["best time", "history", "culture", "tips", "safety"];

/// Which tools a query should use, plus the extracted city if any
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Intent {
    pub use_weather: bool,
    pub use_search: bool,
    pub use_rag: bool,
    pub city: Option<String>,
}

/// Results of the side-effecting tools for one query
#[derive(Debug, Clone, Default)]
pub struct ToolResults {
    pub weather: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ToolRouter;

impl ToolRouter {
    pub fn new() -> Self {
        Self
    }

    /// Classify a query. Falls back to RAG when nothing else matches.
    pub fn detect_intent(&self, query: &str) -> Intent {
        let query = query.to_lowercase();
        let mut intent = Intent::default();

        if contains_any(&query, WEATHER_KEYWORDS) {
            intent.use_weather = true;
        }

        if let Some(captures) = CITY_RE.captures(&query) {
            let city = captures[1].trim();
            if !city.is_empty() {
                intent.city = Some(title_case(city));
            }
        }

        if contains_any(&query, SEARCH_KEYWORDS) {
            intent.use_search = true;
        }

        if contains_any(&query, PLANNING_KEYWORDS) {
            intent.use_weather = true;
            intent.use_search = true;
            intent.use_rag = true;
        }

        if contains_any(&query, RAG_KEYWORDS) {
            intent.use_rag = true;
        }

        if !intent.use_weather && !intent.use_search && !intent.use_rag {
            intent.use_rag = true;
        }

        intent
    }

    /// Run the weather and web-search tools selected by an intent.
    /// Failures become readable strings in the result.
    pub async fn run_tools(
        &self,
        intent: &Intent,
        query: &str,
        weather: &dyn WeatherProvider,
        search: &dyn WebSearchProvider,
    ) -> ToolResults {
        let mut results = ToolResults::default();

        if intent.use_weather {
            if let Some(city) = &intent.city {
                results.weather = Some(match weather.current_weather(city).await {
                    Ok(summary) => summary,
                    Err(e) => {
                        warn!(city = %city, error = %e, "Weather tool failed");
                        format!("Weather unavailable: {}", e)
                    }
                });
            }
        }

        if intent.use_search {
            results.search = Some(match search.search(query).await {
                Ok(text) => text,
                Err(e) => {
                    warn!(error = %e, "Web search tool failed");
                    format!("Search failed: {}", e)
                }
            });
        }

        results
    }
}

fn contains_any(query: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| query.contains(k))
}

/// Capitalize the first letter of each whitespace-separated word
pub fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
