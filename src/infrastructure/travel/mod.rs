//! Travel data provider implementations

pub mod flights;
pub mod hotels;
pub mod maps;
pub mod places;
pub mod weather;
pub mod web_search;

pub use flights::SerpFlightsProvider;
pub use hotels::SerpHotelsProvider;
pub use maps::SerpMapsProvider;
pub use places::SerpPlacesProvider;
pub use weather::OpenWeatherProvider;
pub use web_search::SerpWebSearchProvider;

pub(crate) const SERPAPI_URL: &str = "https://serpapi.com/search";
