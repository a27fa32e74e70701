//! Travel data collaborators: normalized result types and provider traits
//!
//! Each provider is a black box: structured query in, normalized results
//! out, `DomainError` on failure. Callers that feed an LLM prompt convert
//! failures into sentinel text instead of propagating them.

use std::fmt::Debug;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Cabin class accepted by the flight search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CabinClass {
    Economy,
    PremiumEconomy,
    Business,
    First,
}

impl CabinClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Economy => "economy",
            Self::PremiumEconomy => "premium_economy",
            Self::Business => "business",
            Self::First => "first",
        }
    }
}

impl std::str::FromStr for CabinClass {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "economy" => Ok(Self::Economy),
            "premium_economy" => Ok(Self::PremiumEconomy),
            "business" => Ok(Self::Business),
            "first" => Ok(Self::First),
            other => Err(DomainError::validation(format!(
                "cabin_class must be one of economy, premium_economy, business, first (got {})",
                other
            ))),
        }
    }
}

/// Round-trip flight search query
#[derive(Debug, Clone, Serialize)]
pub struct FlightQuery {
    pub origin_iata: String,
    pub destination_iata: String,
    pub depart_date: String,
    pub return_date: String,
    pub passengers: u32,
    pub cabin_class: CabinClass,
    pub currency: String,
    pub max_results: usize,
}

/// A normalized flight option
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightOption {
    pub airline: String,
    pub flight_number: Option<String>,
    pub outbound_departure: Option<String>,
    pub inbound_arrival: Option<String>,
    pub duration_minutes: Option<u32>,
    pub stops: Option<u32>,
    pub price: Option<f64>,
    pub currency: String,
}

/// Hotel search query
#[derive(Debug, Clone, Serialize)]
pub struct HotelQuery {
    pub city: String,
    pub checkin: String,
    pub checkout: String,
    pub adults: u32,
    pub rooms: u32,
    pub currency: String,
    pub max_results: usize,
}

/// A normalized hotel option
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HotelOption {
    pub name: String,
    pub rating: Option<f64>,
    pub reviews: Option<u64>,
    pub price_per_night: Option<f64>,
    pub currency: String,
    pub address: Option<String>,
}

/// Points-of-interest query
#[derive(Debug, Clone, Serialize)]
pub struct PlacesQuery {
    pub city: String,
    pub interests: Option<String>,
    pub max_results: usize,
}

/// A normalized point of interest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Place {
    pub title: String,
    pub category: Option<String>,
    pub rating: Option<f64>,
    pub reviews: Option<u64>,
    pub price_level: Option<String>,
    pub address: Option<String>,
    pub snippet: Option<String>,
}

/// Driving distance between two free-text locations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistanceInfo {
    pub origin: String,
    pub destination: String,
    pub distance: Option<String>,
    pub duration: Option<String>,
}

/// Current-weather lookup, returning a short human-readable summary
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current_weather(&self, city: &str) -> Result<String, DomainError>;
}

/// Round-trip flight search
#[async_trait]
pub trait FlightSearchProvider: Send + Sync + Debug {
    async fn search_flights(&self, query: &FlightQuery) -> Result<Vec<FlightOption>, DomainError>;
}

/// Hotel search
#[async_trait]
pub trait HotelSearchProvider: Send + Sync + Debug {
    async fn search_hotels(&self, query: &HotelQuery) -> Result<Vec<HotelOption>, DomainError>;
}

/// Points-of-interest search
#[async_trait]
pub trait PlacesProvider: Send + Sync + Debug {
    async fn search_places(&self, query: &PlacesQuery) -> Result<Vec<Place>, DomainError>;
}

/// Driving-distance lookup (optional prompt enrichment)
#[async_trait]
pub trait DistanceProvider: Send + Sync + Debug {
    async fn distance(&self, origin: &str, destination: &str)
        -> Result<DistanceInfo, DomainError>;
}

/// Web search returning a merged text block of top results
#[async_trait]
pub trait WebSearchProvider: Send + Sync + Debug {
    async fn search(&self, query: &str) -> Result<String, DomainError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;

    macro_rules! mock_provider {
        ($name:ident, $ok:ty) => {
            #[derive(Debug, Default)]
            pub struct $name {
                response: Option<$ok>,
                error: Option<String>,
            }

            impl $name {
                pub fn returning(response: $ok) -> Self {
                    Self {
                        response: Some(response),
                        error: None,
                    }
                }

                pub fn failing(error: impl Into<String>) -> Self {
                    Self {
                        response: None,
                        error: Some(error.into()),
                    }
                }

                fn resolve(&self) -> Result<$ok, DomainError> {
                    if let Some(ref error) = self.error {
                        return Err(DomainError::provider("mock", error));
                    }
                    self.response
                        .clone()
                        .ok_or_else(|| DomainError::provider("mock", "no mock response"))
                }
            }
        };
    }

    mock_provider!(MockWeather, String);
    mock_provider!(MockFlights, Vec<FlightOption>);
    mock_provider!(MockHotels, Vec<HotelOption>);
    mock_provider!(MockPlaces, Vec<Place>);
    mock_provider!(MockDistance, DistanceInfo);
    mock_provider!(MockWebSearch, String);

    #[async_trait]
    impl WeatherProvider for MockWeather {
        async fn current_weather(&self, _city: &str) -> Result<String, DomainError> {
            self.resolve()
        }
    }

    #[async_trait]
    impl FlightSearchProvider for MockFlights {
        async fn search_flights(
            &self,
            _query: &FlightQuery,
        ) -> Result<Vec<FlightOption>, DomainError> {
            self.resolve()
        }
    }

    #[async_trait]
    impl HotelSearchProvider for MockHotels {
        async fn search_hotels(
            &self,
            _query: &HotelQuery,
        ) -> Result<Vec<HotelOption>, DomainError> {
            self.resolve()
        }
    }

    #[async_trait]
    impl PlacesProvider for MockPlaces {
        async fn search_places(&self, _query: &PlacesQuery) -> Result<Vec<Place>, DomainError> {
            self.resolve()
        }
    }

    #[async_trait]
    impl DistanceProvider for MockDistance {
        async fn distance(
            &self,
            _origin: &str,
            _destination: &str,
        ) -> Result<DistanceInfo, DomainError> {
            self.resolve()
        }
    }

    #[async_trait]
    impl WebSearchProvider for MockWebSearch {
        async fn search(&self, _query: &str) -> Result<String, DomainError> {
            self.resolve()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_cabin_class_roundtrip() {
        for s in ["economy", "premium_economy", "business", "first"] {
            assert_eq!(CabinClass::from_str(s).unwrap().as_str(), s);
        }
    }

    #[test]
    fn test_cabin_class_rejects_unknown() {
        assert!(CabinClass::from_str("steerage").is_err());
    }
}
