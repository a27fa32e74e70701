use async_trait::async_trait;

use crate::domain::travel::{DistanceInfo, DistanceProvider};
use crate::domain::DomainError;
use crate::infrastructure::http_client::HttpClientTrait;

use super::SERPAPI_URL;

/// Driving-distance lookup via the SerpAPI Google Maps distance matrix
#[derive(Debug)]
pub struct SerpMapsProvider<C: HttpClientTrait> {
    client: C,
    api_key: Option<String>,
    base_url: String,
}

impl<C: HttpClientTrait> SerpMapsProvider<C> {
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
impl<C: HttpClientTrait> DistanceProvider for SerpMapsProvider<C> {
    async fn distance(
        &self,
        origin: &str,
        destination: &str,
    ) -> Result<DistanceInfo, DomainError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| DomainError::configuration("SERPAPI_KEY is not set"))?;

        let params = [
            ("engine", "google_maps"),
            ("type", "distance_matrix"),
            ("origins", origin),
            ("destinations", destination),
            ("api_key", api_key),
        ];

        let data = self.client.get_json(&self.base_url, &params).await?;

        let element = data
            .get("distance_matrix")
            .and_then(|m| m.get("rows"))
            .and_then(|r| r.get(0))
            .and_then(|r| r.get("elements"))
            .and_then(|e| e.get(0));

        let text = |key: &str| {
            element
                .and_then(|e| e.get(key))
                .and_then(|v| v.get("text"))
                .and_then(|v| v.as_str())
                .map(str::to_string)
        };

        Ok(DistanceInfo {
            origin: origin.to_string(),
            destination: destination.to_string(),
            distance: text("distance"),
            duration: text("duration"),
        })
    }
}
