//! Appointment-booking wizard handlers.
//!
//! Wizard state is per session and in-memory only; restarting the server
//! drops in-flight sessions back to idle, which matches how little state
//! the wizard carries.

use std::time::Instant;

use axum::Json;
use axum::extract::{Path, State};
use serde::Deserialize;

use crate::http::error::AppError;
use crate::http::extractors::auth::Authenticated;
use crate::http::handlers::bot::resolve_bot;
use crate::http::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct BookingTurnRequest {
    pub message: String,
}

/// POST /api/v1/bots/:key/booking - Advance the booking wizard one turn.
pub async fn advance_booking(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(key): Path<String>,
    Json(body): Json<BookingTurnRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let Some(form_client) = state.form_client.clone() else {
        return Err(AppError::Validation(
            "booking is not configured: set form_endpoint in config.toml".to_string(),
        ));
    };

    let bot = resolve_bot(&state, &auth, &key).await?;
    let session_key = format!("{}/{}", auth.owner, bot.key);

    // Take the flow out of the map for the duration of the turn so the
    // dashmap guard is never held across an await.
    let mut flow = state
        .booking_sessions
        .remove(&session_key)
        .map(|(_, flow)| flow)
        .unwrap_or_default();

    let reply = flow.advance(body.message.trim(), &form_client).await;
    let stage = flow.stage();
    state.booking_sessions.insert(session_key, flow);

    let elapsed = start.elapsed().as_millis() as u64;
    let data = serde_json::json!({
        "reply": reply,
        "stage": stage,
    });

    Ok(Json(ApiResponse::success(data, request_id, elapsed)))
}

/// POST /api/v1/bots/:key/booking/reset - Drop the wizard back to idle.
pub async fn reset_booking(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(key): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let bot = resolve_bot(&state, &auth, &key).await?;
    let session_key = format!("{}/{}", auth.owner, bot.key);
    state.booking_sessions.remove(&session_key);

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(
        serde_json::json!({ "reset": bot.key.to_string() }),
        request_id,
        elapsed,
    )))
}
