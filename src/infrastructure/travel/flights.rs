use async_trait::async_trait;

use crate::domain::travel::{FlightOption, FlightQuery, FlightSearchProvider};
use crate::domain::DomainError;
use crate::infrastructure::http_client::HttpClientTrait;

use super::SERPAPI_URL;

/// Round-trip flight search via the SerpAPI Google Flights engine
#[derive(Debug)]
pub struct SerpFlightsProvider<C: HttpClientTrait> {
    client: C,
    api_key: Option<String>,
    base_url: String,
}

impl<C: HttpClientTrait> SerpFlightsProvider<C> {
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
impl<C: HttpClientTrait> FlightSearchProvider for SerpFlightsProvider<C> {
    async fn search_flights(&self, query: &FlightQuery) -> Result<Vec<FlightOption>, DomainError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| DomainError::configuration("SERPAPI_KEY is not set"))?;

        let passengers = query.passengers.to_string();
        // travel_class is deliberately not sent; the upstream engine rejects
        // it for some routes and defaults to economy anyway
        let params = [
            ("engine", "google_flights"),
            ("departure_id", query.origin_iata.as_str()),
            ("arrival_id", query.destination_iata.as_str()),
            ("outbound_date", query.depart_date.as_str()),
            ("return_date", query.return_date.as_str()),
            ("adults", passengers.as_str()),
            ("type", "1"),
            ("currency", query.currency.as_str()),
            ("hl", "en"),
            ("api_key", api_key),
        ];

        let data = self.client.get_json(&self.base_url, &params).await?;
        Ok(parse_flights(&data, query))
    }
}

fn parse_flights(data: &serde_json::Value, query: &FlightQuery) -> Vec<FlightOption> {
    let raw = data
        .get("best_flights")
        .and_then(|v| v.as_array())
        .filter(|a| !a.is_empty())
        .or_else(|| data.get("other_flights").and_then(|v| v.as_array()));

    let Some(raw) = raw else {
        return Vec::new();
    };

    let mut flights = Vec::new();
    for option in raw.iter().take(query.max_results) {
        let segments = option
            .get("segments")
            .and_then(|v| v.as_array())
            .filter(|s| !s.is_empty());
        let Some(segments) = segments else {
            continue;
        };

        let first = &segments[0];
        let last = &segments[segments.len() - 1];

        let (price, currency) = parse_price(option.get("price"), &query.currency);

        flights.push(FlightOption {
            airline: first
                .get("airline")
                .and_then(|v| v.as_str())
                .unwrap_or("Unknown airline")
                .to_string(),
            flight_number: string_field(first, "flight_number"),
            outbound_departure: string_field(first, "departure_time"),
            inbound_arrival: string_field(last, "arrival_time"),
            duration_minutes: option
                .get("total_duration")
                .and_then(|v| v.as_u64())
                .map(|d| d as u32),
            stops: option.get("stops").and_then(|v| v.as_u64()).map(|s| s as u32),
            price,
            currency,
        });
    }
    flights
}

// price arrives either as a bare number or as {"raw": ..., "currency": ...}
fn parse_price(value: Option<&serde_json::Value>, default_currency: &str) -> (Option<f64>, String) {
    match value {
        Some(serde_json::Value::Number(n)) => (n.as_f64(), default_currency.to_string()),
        Some(serde_json::Value::Object(map)) => {
            let price = map.get("raw").and_then(|v| v.as_f64());
            let currency = map
                .get("currency")
                .and_then(|v| v.as_str())
                .unwrap_or(default_currency)
                .to_string();
            (price, currency)
        }
        _ => (None, default_currency.to_string()),
    }
}

fn string_field(value: &serde_json::Value, key: &str) -> Option<String> {
    value.get(key).and_then(|v| v.as_str()).map(str::to_string)
}
