use async_trait::async_trait;

use crate::domain::travel::{HotelOption, HotelQuery, HotelSearchProvider};
use crate::domain::DomainError;
use crate::infrastructure::http_client::HttpClientTrait;

use super::SERPAPI_URL;

/// Hotel search via the SerpAPI Google Hotels engine
#[derive(Debug)]
pub struct SerpHotelsProvider<C: HttpClientTrait> {
    client: C,
    api_key: Option<String>,
    base_url: String,
}

impl<C: HttpClientTrait> SerpHotelsProvider<C> {
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
impl<C: HttpClientTrait> HotelSearchProvider for SerpHotelsProvider<C> {
    async fn search_hotels(&self, query: &HotelQuery) -> Result<Vec<HotelOption>, DomainError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| DomainError::configuration("SERPAPI_KEY is not set"))?;

        let adults = query.adults.to_string();
        let rooms = query.rooms.to_string();
        let params = [
            ("engine", "google_hotels"),
            ("q", query.city.as_str()),
            ("check_in_date", query.checkin.as_str()),
            ("check_out_date", query.checkout.as_str()),
            ("adults", adults.as_str()),
            ("rooms", rooms.as_str()),
            ("currency", query.currency.as_str()),
            ("hl", "en"),
            ("api_key", api_key),
        ];

        let data = self.client.get_json(&self.base_url, &params).await?;
        Ok(parse_hotels(&data, query))
    }
}

fn parse_hotels(data: &serde_json::Value, query: &HotelQuery) -> Vec<HotelOption> {
    let Some(properties) = data.get("properties").and_then(|v| v.as_array()) else {
        return Vec::new();
    };

    properties
        .iter()
        .take(query.max_results)
        .filter_map(|h| {
            let name = h.get("name").and_then(|v| v.as_str())?;
            Some(HotelOption {
                name: name.to_string(),
                rating: h
                    .get("overall_rating")
                    .and_then(|v| v.as_f64())
                    .or_else(|| h.get("rating").and_then(|v| v.as_f64())),
                reviews: h.get("reviews").and_then(|v| v.as_u64()),
                price_per_night: parse_rate(h),
                currency: query.currency.clone(),
                address: h.get("address").and_then(|v| v.as_str()).map(str::to_string),
            })
        })
        .collect()
}

// rate_per_night is an object with extracted prices; older payloads carry a
// flat "rate" object instead
fn parse_rate(hotel: &serde_json::Value) -> Option<f64> {
    hotel
        .get("rate_per_night")
        .and_then(|r| r.get("extracted_lowest"))
        .and_then(|v| v.as_f64())
        .or_else(|| {
            hotel
                .get("rate")
                .and_then(|r| r.get("extracted_lowest_price"))
                .and_then(|v| v.as_f64())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::http_client::mock::MockHttpClient;

    fn query() -> HotelQuery {
        HotelQuery {
            city: "Goa".to_string(),
            checkin: "2026-09-01".to_string(),
            checkout: "2026-09-05".to_string(),
            adults: 2,
            rooms: 1,
            currency: "INR".to_string(),
            max_results: 5,
        }
    }

    #[tokio::test]
    async fn test_parses_properties() {
        let mock_response = serde_json::json!({
            "properties": [{
                "name": "Beachside Resort",
                "overall_rating": 4.3,
                "reviews": 1200,
                "rate_per_night": { "extracted_lowest": 3500 },
                "address": "Baga, Goa"
            }]
        });

        let client = MockHttpClient::new().with_response(SERPAPI_URL, mock_response);
        let provider = SerpHotelsProvider::new(client, Some("key".to_string()));

        let hotels = provider.search_hotels(&query()).await.unwrap();
        assert_eq!(hotels.len(), 1);
        assert_eq!(hotels[0].name, "Beachside Resort");
        assert_eq!(hotels[0].rating, Some(4.3));
        assert_eq!(hotels[0].price_per_night, Some(3500.0));
        assert_eq!(hotels[0].address.as_deref(), Some("Baga, Goa"));
    }

    #[tokio::test]
    async fn test_legacy_rate_object() {
        let mock_response = serde_json::json!({
            "properties": [{
                "name": "Old Format Inn",
                "rating": 3.9,
                "rate": { "extracted_lowest_price": 2100 }
            }]
        });

        let client = MockHttpClient::new().with_response(SERPAPI_URL, mock_response);
        let provider = SerpHotelsProvider::new(client, Some("key".to_string()));

        let hotels = provider.search_hotels(&query()).await.unwrap();
        assert_eq!(hotels[0].rating, Some(3.9));
        assert_eq!(hotels[0].price_per_night, Some(2100.0));
    }

    #[tokio::test]
    async fn test_nameless_properties_skipped() {
        let mock_response = serde_json::json!({
            "properties": [{ "overall_rating": 4.0 }]
        });

        let client = MockHttpClient::new().with_response(SERPAPI_URL, mock_response);
        let provider = SerpHotelsProvider::new(client, Some("key".to_string()));

        let hotels = provider.search_hotels(&query()).await.unwrap();
        assert!(hotels.is_empty());
    }

    #[tokio::test]
    async fn test_missing_api_key() {
        let provider = SerpHotelsProvider::new(MockHttpClient::new(), None);
        let error = provider.search_hotels(&query()).await.unwrap_err();
        assert!(matches!(error, DomainError::Configuration { .. }));
    }
}
