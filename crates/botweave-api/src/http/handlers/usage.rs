//! Usage and quota handlers.

use std::time::Instant;

use axum::Json;
use axum::extract::{Path, State};

use botweave_core::convo::ConversationRepository;
use botweave_core::quota::MAX_CREDITS;
use botweave_types::chat::today;

use crate::http::error::AppError;
use crate::http::extractors::auth::Authenticated;
use crate::http::handlers::bot::resolve_bot;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// GET /api/v1/bots/:key/usage - Today's metering snapshot for a bot.
///
/// Returns the server-side daily counter plus the advisory credit balance,
/// so a dashboard can show both in one call.
pub async fn get_usage(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(key): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let bot = resolve_bot(&state, &auth, &key).await?;
    let day = today();
    let used = state
        .conversation_repo
        .load_usage(&auth.owner, &bot.key, &day)
        .await?;
    let credits = state.controller.credits(&bot).await;

    let elapsed = start.elapsed().as_millis() as u64;
    let data = serde_json::json!({
        "day": day,
        "used": used,
        "limit": bot.usage_limit,
        "credits_remaining": credits,
        "credits_max": MAX_CREDITS,
    });

    Ok(Json(ApiResponse::success(data, request_id, elapsed)))
}
