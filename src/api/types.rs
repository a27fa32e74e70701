//! Request and response bodies for the HTTP API

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::error::ApiError;

fn default_cabin_class() -> String {
    "economy".to_string()
}

fn default_passengers() -> u32 {
    1
}

#[derive(Debug, Deserialize, Validate)]
pub struct ChatRequest {
    #[validate(length(min = 1, max = 2000, message = "message must be 1-2000 characters"))]
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct TripPlanRequest {
    #[validate(length(min = 2, max = 100, message = "origin_city must be 2-100 characters"))]
    pub origin_city: String,
    #[validate(length(
        min = 2,
        max = 100,
        message = "destination_city must be 2-100 characters"
    ))]
    pub destination_city: String,
    pub depart_date: String,
    pub return_date: String,
    #[validate(range(min = 1, max = 20, message = "passengers must be 1-20"))]
    #[serde(default = "default_passengers")]
    pub passengers: u32,
    #[serde(default = "default_cabin_class")]
    pub cabin_class: String,
    #[validate(length(max = 300, message = "interests must be at most 300 characters"))]
    pub interests: Option<String>,
    #[validate(range(min = 0.0, message = "max_budget must be non-negative"))]
    pub max_budget: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TripPlanResponse {
    pub itinerary: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RefineRequest {
    #[validate(length(min = 1, message = "itinerary must not be empty"))]
    pub itinerary: String,
    #[validate(length(min = 1, max = 2000, message = "feedback must be 1-2000 characters"))]
    pub feedback: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RefineResponse {
    pub itinerary: String,
}

/// Run validator-derived checks and surface the first failure as a 400
pub fn validate_request<T: Validate>(request: &T) -> Result<(), ApiError> {
    request.validate().map_err(|e| {
        let message = e
            .field_errors()
            .into_iter()
            .flat_map(|(_, errors)| errors.iter())
            .filter_map(|error| error.message.as_ref().map(|m| m.to_string()))
            .next()
            .unwrap_or_else(|| "Invalid request".to_string());
        ApiError::bad_request(message)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_request_rejects_empty_message() {
        let request = ChatRequest {
            message: String::new(),
        };
        assert!(validate_request(&request).is_err());
    }

    #[test]
    fn test_chat_request_rejects_oversized_message() {
        let request = ChatRequest {
            message: "x".repeat(2001),
        };
        assert!(validate_request(&request).is_err());
    }

    #[test]
    fn test_trip_request_defaults() {
        let request: TripPlanRequest = serde_json::from_value(serde_json::json!({
            "origin_city": "Hyderabad",
            "destination_city": "Goa",
            "depart_date": "2026-09-01",
            "return_date": "2026-09-05"
        }))
        .unwrap();

        assert_eq!(request.passengers, 1);
        assert_eq!(request.cabin_class, "economy");
        assert!(validate_request(&request).is_ok());
    }

    #[test]
    fn test_trip_request_rejects_too_many_passengers() {
        let request: TripPlanRequest = serde_json::from_value(serde_json::json!({
            "origin_city": "Hyderabad",
            "destination_city": "Goa",
            "depart_date": "2026-09-01",
            "return_date": "2026-09-05",
            "passengers": 21
        }))
        .unwrap();

        let error = validate_request(&request).unwrap_err();
        assert!(error.response.error.message.contains("passengers"));
    }
}
