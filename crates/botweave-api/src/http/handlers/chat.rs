//! Conversation handlers: submit a turn, read the transcript, clear it.

use std::time::Instant;

use axum::Json;
use axum::extract::{Path, State};
use serde::Deserialize;

use botweave_core::convo::{ConversationRepository, TurnKind};
use botweave_core::memory::MemoryRepository;

use crate::http::error::AppError;
use crate::http::extractors::auth::Authenticated;
use crate::http::handlers::bot::resolve_bot;
use crate::http::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatTurnRequest {
    pub message: String,
}

fn turn_kind_label(kind: TurnKind) -> &'static str {
    match kind {
        TurnKind::Reply => "reply",
        TurnKind::Fallback => "fallback",
        TurnKind::Blocked => "blocked",
        TurnKind::LimitReached => "limit_reached",
        TurnKind::Bookkeeping => "bookkeeping",
        TurnKind::Ignored => "ignored",
    }
}

/// POST /api/v1/bots/:key/chat - Submit one user turn.
///
/// Always returns 200 with the turn kind and the updated transcript; the
/// controller folds gateway failures into the transcript itself.
pub async fn submit_turn(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(key): Path<String>,
    Json(body): Json<ChatTurnRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let bot = resolve_bot(&state, &auth, &key).await?;

    let memory = match state.memory_repo.load(&auth.owner, &bot.key).await {
        Ok(memory) => memory,
        Err(err) => {
            tracing::warn!(error = %err, bot = %bot.key, "failed to load memory");
            None
        }
    };

    let turn = state
        .controller
        .submit(&bot, memory.as_ref(), &body.message)
        .await;

    let elapsed = start.elapsed().as_millis() as u64;
    let data = serde_json::json!({
        "kind": turn_kind_label(turn.kind),
        "messages": turn.transcript,
    });

    Ok(Json(ApiResponse::success(data, request_id, elapsed)))
}

/// GET /api/v1/bots/:key/chat - Read the persisted transcript.
pub async fn get_transcript(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(key): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let bot = resolve_bot(&state, &auth, &key).await?;
    let messages = state
        .conversation_repo
        .load(&auth.owner, &bot.key)
        .await?
        .unwrap_or_default();

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(
        serde_json::json!({ "messages": messages }),
        request_id,
        elapsed,
    )))
}

/// GET /api/v1/bots/:key/summary - Summarize the transcript via the model.
///
/// Owner-facing and unmetered; an upstream failure surfaces as 502 instead
/// of the widget's fallback notice. `summary` is null when there is no
/// conversation yet.
pub async fn summarize_chat(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(key): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let bot = resolve_bot(&state, &auth, &key).await?;
    let summary = state
        .controller
        .summarize(&bot)
        .await
        .map_err(AppError::Gateway)?;

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(
        serde_json::json!({ "summary": summary }),
        request_id,
        elapsed,
    )))
}

/// POST /api/v1/bots/:key/chat/clear - Delete the transcript.
///
/// Credits and daily usage counters are left untouched; clearing history
/// is not a way to refill quota.
pub async fn clear_transcript(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(key): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let bot = resolve_bot(&state, &auth, &key).await?;
    state.controller.clear(&bot).await?;

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(
        serde_json::json!({ "cleared": bot.key.to_string() }),
        request_id,
        elapsed,
    )))
}
