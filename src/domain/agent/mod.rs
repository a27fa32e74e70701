//! Travel agent orchestration
//!
//! Composes the LLM, the RAG engine, the tool router, and the travel data
//! providers into the chat and trip-planning flows. Travel data lookups are
//! cached and degrade to sentinel text or empty lists so a single upstream
//! outage never sinks a whole plan. Only the final LLM call is fatal.

pub mod geo;

use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use futures::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::domain::cache::{cache_key, Cache, CacheExt};
use crate::domain::llm::{LlmProvider, LlmRequest};
use crate::domain::rag::{RagEngine, SearchOptions};
use crate::domain::router::{title_case, ToolRouter};
use crate::domain::travel::{
    CabinClass, DistanceProvider, FlightOption, FlightQuery, FlightSearchProvider, HotelOption,
    HotelQuery, HotelSearchProvider, Place, PlacesProvider, PlacesQuery, WeatherProvider,
    WebSearchProvider,
};
use crate::domain::DomainError;

const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(600);
const DEFAULT_CURRENCY: &str = "INR";
const MAX_RESULTS: usize = 5;
const DEFAULT_TOP_K: usize = 5;

/// Stream of response text fragments
pub type TokenStream = Pin<Box<dyn Stream<Item = Result<String, DomainError>> + Send>>;

/// Trip-planning request after API-level validation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripRequest {
    pub origin_city: String,
    pub destination_city: String,
    pub depart_date: String,
    pub return_date: String,
    pub passengers: u32,
    pub cabin_class: CabinClass,
    pub interests: Option<String>,
    pub max_budget: Option<f64>,
}

/// Everything the agent gathered before composing the itinerary prompt
#[derive(Debug)]
struct TripContext {
    origin: String,
    destination: String,
    weather: String,
    flights: Vec<FlightOption>,
    hotels: Vec<HotelOption>,
    places: Vec<Place>,
    distance_hint: Option<String>,
    rag_context: String,
    days: u32,
}

/// External collaborators for travel data lookups
#[derive(Clone)]
pub struct TravelToolset {
    pub weather: Arc<dyn WeatherProvider>,
    pub flights: Arc<dyn FlightSearchProvider>,
    pub hotels: Arc<dyn HotelSearchProvider>,
    pub places: Arc<dyn PlacesProvider>,
    pub maps: Arc<dyn DistanceProvider>,
    pub web_search: Arc<dyn WebSearchProvider>,
}

impl std::fmt::Debug for TravelToolset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TravelToolset").finish_non_exhaustive()
    }
}

/// Orchestrator for chat and trip-planning requests
pub struct TravelAgent {
    llm: Arc<dyn LlmProvider>,
    model: String,
    rag: Arc<RagEngine>,
    router: ToolRouter,
    tools: TravelToolset,
    cache: Arc<dyn Cache>,
    cache_ttl: Duration,
    top_k: usize,
}

impl std::fmt::Debug for TravelAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TravelAgent")
            .field("model", &self.model)
            .field("provider", &self.llm.provider_name())
            .finish_non_exhaustive()
    }
}

impl TravelAgent {
    pub fn new(
        llm: Arc<dyn LlmProvider>,
        model: impl Into<String>,
        rag: Arc<RagEngine>,
        tools: TravelToolset,
        cache: Arc<dyn Cache>,
    ) -> Self {
        Self {
            llm,
            model: model.into(),
            rag,
            router: ToolRouter::new(),
            tools,
            cache,
            cache_ttl: DEFAULT_CACHE_TTL,
            top_k: DEFAULT_TOP_K,
        }
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Number of neighbors retrieved per RAG lookup
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn rag(&self) -> &RagEngine {
        &self.rag
    }

    /// Plan a round trip end to end and return a day-wise itinerary.
    ///
    /// City validation is the only hard gate before the LLM call; every data
    /// lookup after it degrades gracefully.
    pub async fn plan_trip(&self, request: &TripRequest) -> Result<String, DomainError> {
        let origin = geo::canonical_city(&request.origin_city);
        let destination = geo::canonical_city(&request.destination_city);

        let origin_iata = geo::iata_code(&origin).ok_or_else(|| {
            DomainError::validation(format!("Unsupported origin city: {}", title_case(&origin)))
        })?;
        let destination_iata = geo::iata_code(&destination).ok_or_else(|| {
            DomainError::validation(format!(
                "Unsupported destination city: {}",
                title_case(&destination)
            ))
        })?;

        let depart_date = geo::normalize_date(&request.depart_date)?;
        let return_date = geo::normalize_date(&request.return_date)?;
        let days = geo::trip_days(&depart_date, &return_date);

        info!(
            origin = %origin,
            destination = %destination,
            depart = %depart_date,
            days,
            "Planning trip"
        );

        let flight_query = FlightQuery {
            origin_iata: origin_iata.to_string(),
            destination_iata: destination_iata.to_string(),
            depart_date: depart_date.clone(),
            return_date: return_date.clone(),
            passengers: request.passengers,
            cabin_class: request.cabin_class,
            currency: DEFAULT_CURRENCY.to_string(),
            max_results: MAX_RESULTS,
        };
        let hotel_query = HotelQuery {
            city: title_case(&destination),
            checkin: depart_date.clone(),
            checkout: return_date.clone(),
            adults: request.passengers,
            rooms: 1,
            currency: DEFAULT_CURRENCY.to_string(),
            max_results: MAX_RESULTS,
        };
        let places_query = PlacesQuery {
            city: title_case(&destination),
            interests: request.interests.clone(),
            max_results: MAX_RESULTS,
        };

        let context = TripContext {
            origin: title_case(&origin),
            destination: title_case(&destination),
            weather: self.cached_weather(&destination).await,
            flights: self.cached_flights(&flight_query).await,
            hotels: self.cached_hotels(&hotel_query).await,
            places: self.cached_places(&places_query).await,
            distance_hint: self.distance_hint(&origin, &destination).await,
            rag_context: self.destination_context(&destination).await,
            days,
        };

        let prompt = trip_prompt(request, &context, &depart_date, &return_date);
        let llm_request = LlmRequest::builder()
            .system(PLANNER_SYSTEM_PROMPT)
            .user(prompt)
            .temperature(0.4)
            .max_tokens(2048)
            .build();

        let response = self.llm.chat(&self.model, llm_request).await?;
        Ok(response
            .content()
            .map(|c| c.trim().to_string())
            .unwrap_or_default())
    }

    /// Revise an existing itinerary according to user feedback
    pub async fn refine_itinerary(
        &self,
        itinerary: &str,
        feedback: &str,
    ) -> Result<String, DomainError> {
        let prompt = format!(
            "Here is a travel itinerary:\n\n{}\n\nRevise it according to this \
             feedback, keeping the same day-wise structure and budget \
             notes:\n{}",
            itinerary, feedback
        );
        let request = LlmRequest::builder()
            .system(PLANNER_SYSTEM_PROMPT)
            .user(prompt)
            .temperature(0.4)
            .max_tokens(2048)
            .build();

        let response = self.llm.chat(&self.model, request).await?;
        Ok(response
            .content()
            .map(|c| c.trim().to_string())
            .unwrap_or_default())
    }

    /// Answer a free-text question, routing to weather, web search, and RAG
    /// as the query demands
    pub async fn ask(&self, query: &str) -> Result<String, DomainError> {
        let prompt = self.assemble_chat_prompt(query).await?;
        let request = LlmRequest::builder()
            .system(ASSISTANT_SYSTEM_PROMPT)
            .user(prompt)
            .temperature(0.4)
            .max_tokens(2048)
            .build();

        let response = self.llm.chat(&self.model, request).await?;
        Ok(response
            .content()
            .map(|c| c.trim().to_string())
            .unwrap_or_default())
    }

    /// Streaming variant of [`ask`](Self::ask)
    pub async fn ask_stream(&self, query: &str) -> Result<TokenStream, DomainError> {
        let prompt = self.assemble_chat_prompt(query).await?;
        let request = LlmRequest::builder()
            .system(ASSISTANT_SYSTEM_PROMPT)
            .user(prompt)
            .temperature(0.4)
            .max_tokens(2048)
            .build();

        let chunks = self.llm.chat_stream(&self.model, request).await?;
        let tokens = chunks.filter_map(|chunk| async move {
            match chunk {
                Ok(chunk) => chunk.delta.filter(|d| !d.is_empty()).map(Ok),
                Err(e) => Some(Err(e)),
            }
        });
        Ok(Box::pin(tokens))
    }

    /// Direct retrieval access for knowledge-base queries
    pub async fn ask_with_rag(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<String, DomainError> {
        self.rag.search(query, options).await
    }

    async fn assemble_chat_prompt(&self, query: &str) -> Result<String, DomainError> {
        let intent = self.router.detect_intent(query);
        debug!(?intent, "Routed query");

        let tools = self
            .router
            .run_tools(&intent, query, &*self.tools.weather, &*self.tools.web_search)
            .await;

        let mut sections = vec![format!("Question: {}", query)];
        if let Some(weather) = tools.weather {
            sections.push(format!("Current weather: {}", weather));
        }
        if let Some(search) = tools.search {
            sections.push(format!("Web results:\n{}", search));
        }
        if intent.use_rag {
            let context = self.rag.search(query, &self.search_options()).await?;
            sections.push(format!("Knowledge base context:\n{}", context));
        }
        Ok(sections.join("\n\n"))
    }

    fn search_options(&self) -> SearchOptions {
        SearchOptions::default().with_top_k(self.top_k)
    }

    /// RAG context for the destination, summarized when an LLM is attached
    async fn destination_context(&self, destination: &str) -> String {
        let query = format!(
            "travel guide attractions best time to visit {}",
            destination
        );
        let options = self.search_options().with_summarize(true);
        match self.rag.search(&query, &options).await {
            Ok(context) => context,
            Err(e) => {
                warn!(error = %e, "RAG lookup failed during trip planning");
                String::new()
            }
        }
    }

    async fn cached_weather(&self, city: &str) -> String {
        let key = cache_key("weather", &[city]);
        if let Some(cached) = self.cache_get::<String>(&key).await {
            return cached;
        }

        match self.tools.weather.current_weather(&title_case(city)).await {
            Ok(summary) => {
                self.cache_put(&key, &summary).await;
                summary
            }
            Err(e) => {
                warn!(city = %city, error = %e, "Weather lookup failed");
                format!("Weather unavailable: {}", e)
            }
        }
    }

    async fn cached_flights(&self, query: &FlightQuery) -> Vec<FlightOption> {
        let key = cache_key(
            "flights",
            &[
                &query.origin_iata,
                &query.destination_iata,
                &query.depart_date,
                &query.return_date,
                &query.passengers.to_string(),
                query.cabin_class.as_str(),
            ],
        );
        if let Some(cached) = self.cache_get::<Vec<FlightOption>>(&key).await {
            return cached;
        }

        match self.tools.flights.search_flights(query).await {
            Ok(flights) => {
                self.cache_put(&key, &flights).await;
                flights
            }
            Err(e) => {
                warn!(error = %e, "Flight search failed");
                Vec::new()
            }
        }
    }

    async fn cached_hotels(&self, query: &HotelQuery) -> Vec<HotelOption> {
        let key = cache_key("hotels", &[&query.city, &query.checkin, &query.checkout]);
        if let Some(cached) = self.cache_get::<Vec<HotelOption>>(&key).await {
            return cached;
        }

        match self.tools.hotels.search_hotels(query).await {
            Ok(hotels) => {
                self.cache_put(&key, &hotels).await;
                hotels
            }
            Err(e) => {
                warn!(error = %e, "Hotel search failed");
                Vec::new()
            }
        }
    }

    async fn cached_places(&self, query: &PlacesQuery) -> Vec<Place> {
        let interests = query.interests.as_deref().unwrap_or("");
        let key = cache_key("places", &[&query.city, interests]);
        if let Some(cached) = self.cache_get::<Vec<Place>>(&key).await {
            return cached;
        }

        match self.tools.places.search_places(query).await {
            Ok(places) => {
                self.cache_put(&key, &places).await;
                places
            }
            Err(e) => {
                warn!(error = %e, "Places search failed");
                Vec::new()
            }
        }
    }

    /// Driving-distance hint. Purely additive, so failures are only logged.
    async fn distance_hint(&self, origin: &str, destination: &str) -> Option<String> {
        let key = cache_key("maps", &[origin, destination]);
        if let Some(cached) = self.cache_get::<String>(&key).await {
            return Some(cached);
        }

        match self.tools.maps.distance(origin, destination).await {
            Ok(info) => {
                let hint = format!(
                    "Driving from {} to {}: {} ({})",
                    title_case(origin),
                    title_case(destination),
                    info.distance.unwrap_or_else(|| "unknown distance".into()),
                    info.duration.unwrap_or_else(|| "unknown duration".into()),
                );
                self.cache_put(&key, &hint).await;
                Some(hint)
            }
            Err(e) => {
                debug!(error = %e, "Distance lookup skipped");
                None
            }
        }
    }

    async fn cache_get<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.cache.get(key).await {
            Ok(value) => value,
            Err(e) => {
                warn!(key = %key, error = %e, "Cache read failed");
                None
            }
        }
    }

    async fn cache_put<T: Serialize + Sync>(&self, key: &str, value: &T) {
        if let Err(e) = self.cache.set(key, value, self.cache_ttl).await {
            warn!(key = %key, error = %e, "Cache write failed");
        }
    }
}

const PLANNER_SYSTEM_PROMPT: &str = "You are an expert Indian travel planner. \
    Produce practical, day-wise itineraries with realistic timings, local \
    transport suggestions, and approximate costs in INR.";

const ASSISTANT_SYSTEM_PROMPT: &str = "You are a helpful travel assistant for \
    trips within India. Answer using the provided context when available and \
    say so when information is missing.";

fn trip_prompt(
    request: &TripRequest,
    context: &TripContext,
    depart_date: &str,
    return_date: &str,
) -> String {
    let mut sections = vec![format!(
        "Plan a {}-day round trip from {} to {} departing {} and returning \
         {} for {} passenger(s) in {} class.",
        context.days,
        context.origin,
        context.destination,
        depart_date,
        return_date,
        request.passengers,
        request.cabin_class.as_str(),
    )];

    if let Some(interests) = request.interests.as_deref().filter(|i| !i.trim().is_empty()) {
        sections.push(format!("Traveler interests: {}", interests));
    }
    if let Some(budget) = request.max_budget {
        sections.push(format!("Maximum total budget: {:.0} INR.", budget));
    }

    sections.push(format!(
        "Current weather in {}: {}",
        context.destination, context.weather
    ));

    sections.push(format_flights(&context.flights));
    sections.push(format_hotels(&context.hotels));
    sections.push(format_places(&context.places));

    if let Some(hint) = &context.distance_hint {
        sections.push(hint.clone());
    }
    if !context.rag_context.is_empty() {
        sections.push(format!(
            "Destination notes:\n{}",
            context.rag_context
        ));
    }

    sections.push(
        "Produce a day-wise itinerary. Recommend one flight and one hotel \
         from the options above when available, estimate a total cost, and \
         include local tips."
            .to_string(),
    );

    sections.join("\n\n")
}

fn format_flights(flights: &[FlightOption]) -> String {
    if flights.is_empty() {
        return "Flight options: none found.".to_string();
    }
    let mut lines = vec!["Flight options:".to_string()];
    for flight in flights {
        let price = flight
            .price
            .map(|p| format!("{:.0} {}", p, flight.currency))
            .unwrap_or_else(|| "price unknown".to_string());
        let stops = flight
            .stops
            .map(|s| format!("{} stop(s)", s))
            .unwrap_or_else(|| "stops unknown".to_string());
        lines.push(format!(
            "- {} {}: departs {}, {}, {}",
            flight.airline,
            flight.flight_number.as_deref().unwrap_or(""),
            flight.outbound_departure.as_deref().unwrap_or("n/a"),
            stops,
            price,
        ));
    }
    lines.join("\n")
}

fn format_hotels(hotels: &[HotelOption]) -> String {
    if hotels.is_empty() {
        return "Hotel options: none found.".to_string();
    }
    let mut lines = vec!["Hotel options:".to_string()];
    for hotel in hotels {
        let rating = hotel
            .rating
            .map(|r| format!("{:.1}", r))
            .unwrap_or_else(|| "unrated".to_string());
        let price = hotel
            .price_per_night
            .map(|p| format!("{:.0} {}/night", p, hotel.currency))
            .unwrap_or_else(|| "price unknown".to_string());
        lines.push(format!("- {} (rating {}, {})", hotel.name, rating, price));
    }
    lines.join("\n")
}

fn format_places(places: &[Place]) -> String {
    if places.is_empty() {
        return "Points of interest: none found.".to_string();
    }
    let mut lines = vec!["Points of interest:".to_string()];
    for place in places {
        let rating = place
            .rating
            .map(|r| format!(" (rating {:.1})", r))
            .unwrap_or_default();
        lines.push(format!(
            "- {}{}{}",
            place.title,
            rating,
            place
                .snippet
                .as_deref()
                .map(|s| format!(": {}", s))
                .unwrap_or_default(),
        ));
    }
    lines.join("\n")
}
