//! Chat endpoints

use std::convert::Infallible;

use axum::{
    extract::State,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
    Json,
};
use futures::StreamExt;
use tracing::info;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::state::AppState;
use crate::api::types::{validate_request, ChatRequest, ChatResponse};

/// POST /chat
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    validate_request(&request)?;

    let request_id = Uuid::new_v4();
    info!(
        request_id = %request_id,
        chars = request.message.len(),
        "Processing chat request"
    );

    let reply = state.agent.ask(&request.message).await?;
    Ok(Json(ChatResponse { reply }))
}

/// POST /chat/stream
///
/// Token stream over SSE. Mid-stream failures are delivered inline as an
/// `[ERROR]` token because the 200 status is already committed by then.
pub async fn chat_stream(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Response, ApiError> {
    validate_request(&request)?;

    let request_id = Uuid::new_v4();
    info!(
        request_id = %request_id,
        chars = request.message.len(),
        "Processing streaming chat request"
    );

    let tokens = state.agent.ask_stream(&request.message).await?;

    let events = tokens.map(|token| {
        let event = match token {
            Ok(token) => Event::default().data(token),
            Err(e) => Event::default().data(format!("[ERROR] {}", e)),
        };
        Ok::<Event, Infallible>(event)
    });

    Ok(Sse::new(events)
        .keep_alive(KeepAlive::default())
        .into_response())
}
