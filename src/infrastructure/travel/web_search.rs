use async_trait::async_trait;

use crate::domain::travel::WebSearchProvider;
use crate::domain::DomainError;
use crate::infrastructure::http_client::HttpClientTrait;

use super::SERPAPI_URL;

const MAX_RESULTS: usize = 5;

/// General web search via the SerpAPI Google engine, merged into one text
/// block suitable for an LLM prompt
#[derive(Debug)]
pub struct SerpWebSearchProvider<C: HttpClientTrait> {
    client: C,
    api_key: Option<String>,
    base_url: String,
}

impl<C: HttpClientTrait> SerpWebSearchProvider<C> {
    pub fn new(client: C, api_key: Option<String>) -> Self {
        Self {
            client,
            api_key,
            base_url: SERPAPI_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl<C: HttpClientTrait> WebSearchProvider for SerpWebSearchProvider<C> {
    async fn search(&self, query: &str) -> Result<String, DomainError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| DomainError::configuration("SERPAPI_KEY is not set"))?;

        let query = query.trim();
        if query.is_empty() {
            return Err(DomainError::validation("Search query must not be empty"));
        }

        let params = [
            ("engine", "google"),
            ("q", query),
            ("hl", "en"),
            ("api_key", api_key),
        ];

        let data = self.client.get_json(&self.base_url, &params).await?;
        Ok(merge_results(&data))
    }
}

fn merge_results(data: &serde_json::Value) -> String {
    let Some(results) = data.get("organic_results").and_then(|v| v.as_array()) else {
        return "No useful web results found.".to_string();
    };

    let mut blocks = Vec::new();
    for result in results.iter().take(MAX_RESULTS) {
        let title = result.get("title").and_then(|v| v.as_str()).unwrap_or("");
        let snippet = result.get("snippet").and_then(|v| v.as_str()).unwrap_or("");
        let link = result.get("link").and_then(|v| v.as_str()).unwrap_or("");

        if title.is_empty() && snippet.is_empty() {
            continue;
        }
        blocks.push(format!("- {}\n  {}\n  ({})", title, snippet, link));
    }

    if blocks.is_empty() {
        return "No useful web results found.".to_string();
    }

    format!("Top web results:\n{}", blocks.join("\n\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::http_client::mock::MockHttpClient;

    #[tokio::test]
    async fn test_merges_top_results() {
        let mock_response = serde_json::json!({
            "organic_results": [
                {
                    "title": "Top 10 places in Goa",
                    "snippet": "Beaches, forts, and markets worth visiting.",
                    "link": "https://example.com/goa"
                },
                {
                    "title": "Goa nightlife guide",
                    "snippet": "The best beach shacks and clubs.",
                    "link": "https://example.com/nightlife"
                }
            ]
        });

        let client = MockHttpClient::new().with_response(SERPAPI_URL, mock_response);
        let provider = SerpWebSearchProvider::new(client, Some("key".to_string()));

        let text = provider.search("top places in goa").await.unwrap();
        assert!(text.starts_with("Top web results:"));
        assert!(text.contains("Top 10 places in Goa"));
        assert!(text.contains("https://example.com/nightlife"));
    }

    #[tokio::test]
    async fn test_no_results_message() {
        let client =
            MockHttpClient::new().with_response(SERPAPI_URL, serde_json::json!({}));
        let provider = SerpWebSearchProvider::new(client, Some("key".to_string()));

        let text = provider.search("anything").await.unwrap();
        assert_eq!(text, "No useful web results found.");
    }

    #[tokio::test]
    async fn test_blank_query_rejected() {
        let provider =
            SerpWebSearchProvider::new(MockHttpClient::new(), Some("key".to_string()));
        let error = provider.search("  ").await.unwrap_err();
        assert!(matches!(error, DomainError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_missing_api_key() {
        let provider = SerpWebSearchProvider::new(MockHttpClient::new(), None);
        let error = provider.search("goa").await.unwrap_err();
        assert!(matches!(error, DomainError::Configuration { .. }));
    }
}
