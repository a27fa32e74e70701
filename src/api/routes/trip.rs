//! Trip planning endpoints

use std::str::FromStr;

use axum::{extract::State, Json};
use tracing::info;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::state::AppState;
use crate::api::types::{
    validate_request, RefineRequest, RefineResponse, TripPlanRequest, TripPlanResponse,
};
use crate::domain::agent::TripRequest;
use crate::domain::travel::CabinClass;

/// POST /trip
pub async fn plan_trip(
    State(state): State<AppState>,
    Json(request): Json<TripPlanRequest>,
) -> Result<Json<TripPlanResponse>, ApiError> {
    validate_request(&request)?;

    let cabin_class = CabinClass::from_str(&request.cabin_class)?;

    let request_id = Uuid::new_v4();
    info!(
        request_id = %request_id,
        origin = %request.origin_city,
        destination = %request.destination_city,
        "Processing trip request"
    );

    let trip = TripRequest {
        origin_city: request.origin_city,
        destination_city: request.destination_city,
        depart_date: request.depart_date,
        return_date: request.return_date,
        passengers: request.passengers,
        cabin_class,
        interests: request.interests,
        max_budget: request.max_budget,
    };

    let itinerary = state.agent.plan_trip(&trip).await?;
    Ok(Json(TripPlanResponse { itinerary }))
}

/// POST /refine
pub async fn refine(
    State(state): State<AppState>,
    Json(request): Json<RefineRequest>,
) -> Result<Json<RefineResponse>, ApiError> {
    validate_request(&request)?;

    let itinerary = state
        .agent
        .refine_itinerary(&request.itinerary, &request.feedback)
        .await?;
    Ok(Json(RefineResponse { itinerary }))
}
