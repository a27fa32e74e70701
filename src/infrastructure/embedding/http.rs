use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::embedding::{normalize, EmbeddingProvider};
use crate::domain::DomainError;
use crate::infrastructure::http_client::HttpClientTrait;

/// Embedding provider backed by an OpenAI-compatible `/v1/embeddings`
/// endpoint. Vectors are L2-normalized on the way in so the index can score
/// with a plain inner product.
#[derive(Debug)]
pub struct HttpEmbeddingProvider<C: HttpClientTrait> {
    client: C,
    base_url: String,
    auth_header: Option<String>,
    model: String,
    dimensions: usize,
}

impl<C: HttpClientTrait> HttpEmbeddingProvider<C> {
    pub fn new(
        client: C,
        base_url: impl Into<String>,
        model: impl Into<String>,
        dimensions: usize,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            auth_header: None,
            model: model.into(),
            dimensions,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.auth_header = Some(format!("Bearer {}", api_key.into()));
        self
    }

    fn embeddings_url(&self) -> String {
        format!("{}/v1/embeddings", self.base_url)
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        let mut headers = vec![("Content-Type", "application/json")];
        if let Some(auth) = &self.auth_header {
            headers.push(("Authorization", auth.as_str()));
        }
        headers
    }
}

#[async_trait]
impl<C: HttpClientTrait> EmbeddingProvider for HttpEmbeddingProvider<C> {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, DomainError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let body = serde_json::json!({
            "model": self.model,
            "input": texts,
        });

        let response = self
            .client
            .post_json(&self.embeddings_url(), self.headers(), &body)
            .await?;

        let response: EmbeddingsResponse = serde_json::from_value(response).map_err(|e| {
            DomainError::provider("embeddings", format!("Failed to parse response: {}", e))
        })?;

        if response.data.len() != texts.len() {
            return Err(DomainError::provider(
                "embeddings",
                format!(
                    "Expected {} embeddings, got {}",
                    texts.len(),
                    response.data.len()
                ),
            ));
        }

        let mut vectors = Vec::with_capacity(response.data.len());
        for item in response.data {
            if item.embedding.len() != self.dimensions {
                return Err(DomainError::provider(
                    "embeddings",
                    format!(
                        "Expected {} dimensions, got {}",
                        self.dimensions,
                        item.embedding.len()
                    ),
                ));
            }
            let mut vector = item.embedding;
            normalize(&mut vector);
            vectors.push(vector);
        }

        Ok(vectors)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn provider_name(&self) -> &'static str {
        "http-embeddings"
    }
}

#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingItem>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingItem {
    embedding: Vec<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::http_client::mock::MockHttpClient;

    const TEST_URL: &str = "http://localhost:11434/v1/embeddings";

    #[tokio::test]
    async fn test_embed_parses_and_normalizes() {
        let mock_response = serde_json::json!({
            "data": [
                { "embedding": [3.0, 4.0] },
            ]
        });

        let client = MockHttpClient::new().with_response(TEST_URL, mock_response);
        let provider = HttpEmbeddingProvider::new(client, "http://localhost:11434", "test-model", 2);

        let vectors = provider.embed(&["goa".to_string()]).await.unwrap();
        assert_eq!(vectors.len(), 1);
        assert!((vectors[0][0] - 0.6).abs() < 1e-6);
        assert!((vectors[0][1] - 0.8).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_embed_rejects_count_mismatch() {
        let mock_response = serde_json::json!({ "data": [] });

        let client = MockHttpClient::new().with_response(TEST_URL, mock_response);
        let provider = HttpEmbeddingProvider::new(client, "http://localhost:11434", "test-model", 2);

        let result = provider.embed(&["goa".to_string()]).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_embed_rejects_dimension_mismatch() {
        let mock_response = serde_json::json!({
            "data": [ { "embedding": [1.0, 0.0, 0.0] } ]
        });

        let client = MockHttpClient::new().with_response(TEST_URL, mock_response);
        let provider = HttpEmbeddingProvider::new(client, "http://localhost:11434", "test-model", 2);

        let result = provider.embed(&["goa".to_string()]).await;
        assert!(result.is_err());
    }

    #[test]
    fn test_with_api_key_adds_auth_header() {
        let provider =
            HttpEmbeddingProvider::new(MockHttpClient::new(), "http://localhost:11434", "m", 2)
                .with_api_key("secret");
        assert!(provider.headers().contains(&("Authorization", "Bearer secret")));

        let provider = HttpEmbeddingProvider::new(MockHttpClient::new(), "http://localhost", "m", 2);
        assert_eq!(provider.headers(), vec![("Content-Type", "application/json")]);
    }

    #[tokio::test]
    async fn test_empty_input_short_circuits() {
        let client = MockHttpClient::new();
        let provider = HttpEmbeddingProvider::new(client, "http://localhost:11434", "test-model", 2);

        let vectors = provider.embed(&[]).await.unwrap();
        assert!(vectors.is_empty());
    }
}
