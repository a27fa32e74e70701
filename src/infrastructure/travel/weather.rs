use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::travel::WeatherProvider;
use crate::domain::DomainError;
use crate::infrastructure::http_client::HttpClientTrait;

const DEFAULT_OPENWEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// Current-weather lookup via the OpenWeather API
#[derive(Debug)]
pub struct OpenWeatherProvider<C: HttpClientTrait> {
    client: C,
    api_key: Option<String>,
    base_url: String,
}

impl<C: HttpClientTrait> OpenWeatherProvider<C> {
    pub fn new(client: C, api_key: Option<String>) -> Self {
        Self {
            client,
            api_key,
            base_url: DEFAULT_OPENWEATHER_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl<C: HttpClientTrait> WeatherProvider for OpenWeatherProvider<C> {
    async fn current_weather(&self, city: &str) -> Result<String, DomainError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| DomainError::configuration("OPENWEATHER_API_KEY is not set"))?;

        let city = city.trim();
        if city.is_empty() {
            return Err(DomainError::validation("City name must not be empty"));
        }

        let json = self
            .client
            .get_json(
                &self.base_url,
                &[("q", city), ("appid", api_key), ("units", "metric")],
            )
            .await?;

        let report: WeatherResponse = serde_json::from_value(json).map_err(|e| {
            DomainError::provider("openweather", format!("Failed to parse response: {}", e))
        })?;

        let description = report
            .weather
            .first()
            .map(|w| capitalize(&w.description))
            .unwrap_or_else(|| "Unknown".to_string());

        Ok(format!(
            "Weather in {}, {}: {}. Temperature {:.1}°C (feels like {:.1}°C). Humidity {}%.",
            report.name.unwrap_or_else(|| city.to_string()),
            report.sys.country.unwrap_or_default(),
            description,
            report.main.temp,
            report.main.feels_like,
            report.main.humidity,
        ))
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[derive(Debug, Deserialize)]
struct WeatherResponse {
    name: Option<String>,
    #[serde(default)]
    sys: WeatherSys,
    #[serde(default)]
    weather: Vec<WeatherCondition>,
    main: WeatherMain,
}

#[derive(Debug, Default, Deserialize)]
struct WeatherSys {
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WeatherCondition {
    description: String,
}

#[derive(Debug, Deserialize)]
struct WeatherMain {
    temp: f64,
    feels_like: f64,
    humidity: u32,
}
