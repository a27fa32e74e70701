use async_trait::async_trait;

use crate::domain::travel::{Place, PlacesProvider, PlacesQuery};
use crate::domain::DomainError;
use crate::infrastructure::http_client::HttpClientTrait;

use super::SERPAPI_URL;

/// Points-of-interest search via the SerpAPI Tripadvisor engine
#[derive(Debug)]
pub struct SerpPlacesProvider<C: HttpClientTrait> {
    client: C,
    api_key: Option<String>,
    base_url: String,
}

impl<C: HttpClientTrait> SerpPlacesProvider<C> {
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
impl<C: HttpClientTrait> PlacesProvider for SerpPlacesProvider<C> {
    async fn search_places(&self, query: &PlacesQuery) -> Result<Vec<Place>, DomainError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| DomainError::configuration("SERPAPI_KEY is not set"))?;

        let q = match query.interests.as_deref().filter(|i| !i.trim().is_empty()) {
            Some(interests) => format!("{} {}", query.city, interests),
            None => query.city.clone(),
        };

        let params = [
            ("engine", "tripadvisor"),
            ("q", q.as_str()),
            ("hl", "en"),
            ("api_key", api_key),
        ];

        let data = self.client.get_json(&self.base_url, &params).await?;
        Ok(parse_places(&data, query.max_results))
    }
}

fn parse_places(data: &serde_json::Value, max_results: usize) -> Vec<Place> {
    let results = data
        .get("organic_results")
        .and_then(|v| v.as_array())
        .filter(|a| !a.is_empty())
        .or_else(|| data.get("results").and_then(|v| v.as_array()));

    let Some(results) = results else {
        return Vec::new();
    };

    results
        .iter()
        .take(max_results)
        .filter_map(|r| {
            let title = r.get("title").and_then(|v| v.as_str())?;
            Some(Place {
                title: title.to_string(),
                category: string_field(r, "category").or_else(|| string_field(r, "type")),
                rating: r.get("rating").and_then(|v| v.as_f64()),
                reviews: r.get("reviews").and_then(|v| v.as_u64()),
                price_level: string_field(r, "price_level"),
                address: string_field(r, "address"),
                snippet: string_field(r, "snippet").or_else(|| string_field(r, "description")),
            })
        })
        .collect()
}

fn string_field(value: &serde_json::Value, key: &str) -> Option<String> {
    value.get(key).and_then(|v| v.as_str()).map(str::to_string)
}
