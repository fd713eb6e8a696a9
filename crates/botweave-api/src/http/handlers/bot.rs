//! Bot CRUD handlers for the REST API.

use std::time::Instant;

use axum::Json;
use axum::extract::{Path, State};
use chrono::Utc;

use botweave_core::convo::ConversationRepository;
use botweave_core::repository::BotRepository;
use botweave_infra::config::resolve_usage_limit;
use botweave_types::bot::{BotConfig, BotKey, CreateBotRequest};
use botweave_types::error::{BotError, RepositoryError};

use crate::http::error::AppError;
use crate::http::extractors::auth::Authenticated;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Resolve a path segment into a bot key, and fetch the bot for the
/// authenticated owner.
pub(crate) async fn resolve_bot(
    state: &AppState,
    auth: &Authenticated,
    key: &str,
) -> Result<BotConfig, AppError> {
    let key: BotKey = key
        .parse()
        .map_err(|_| AppError::Bot(BotError::NotFound))?;
    match state.bot_repo.get(&auth.owner, &key).await {
        Ok(Some(bot)) => Ok(bot),
        Ok(None) => Err(AppError::Bot(BotError::NotFound)),
        Err(e) => Err(AppError::Repository(e)),
    }
}

/// POST /api/v1/bots - Create a new bot.
pub async fn create_bot(
    State(state): State<AppState>,
    auth: Authenticated,
    Json(body): Json<CreateBotRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let key = BotKey::from_name(&body.name).ok_or_else(|| {
        AppError::Bot(BotError::InvalidName(format!(
            "name '{}' contains no usable characters",
            body.name
        )))
    })?;

    let now = Utc::now();
    let bot = BotConfig {
        owner: auth.owner.clone(),
        key,
        name: body.name,
        prompt: body.prompt.unwrap_or_default(),
        usage_limit: resolve_usage_limit(&state.config, body.usage_limit),
        embed_url: body.embed_url,
        created_at: now,
        updated_at: now,
    };

    match state.bot_repo.create(&bot).await {
        Ok(()) => {}
        Err(RepositoryError::Conflict(_)) => {
            return Err(AppError::Bot(BotError::KeyConflict(bot.key.to_string())));
        }
        Err(e) => return Err(AppError::Repository(e)),
    }

    let elapsed = start.elapsed().as_millis() as u64;
    let bot_json = serde_json::to_value(&bot)
        .map_err(|e| AppError::Internal(e.to_string()))?;
    let resp = ApiResponse::success(bot_json, request_id, elapsed)
        .with_link("self", &format!("/api/v1/bots/{}", bot.key))
        .with_link("chat", &format!("/api/v1/bots/{}/chat", bot.key));

    Ok(Json(resp))
}

/// GET /api/v1/bots - List the authenticated owner's bots.
pub async fn list_bots(
    State(state): State<AppState>,
    auth: Authenticated,
) -> Result<Json<ApiResponse<Vec<serde_json::Value>>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let bots = state.bot_repo.list(&auth.owner).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let bots_json: Vec<serde_json::Value> = bots
        .iter()
        .filter_map(|b| serde_json::to_value(b).ok())
        .collect();

    let resp =
        ApiResponse::success(bots_json, request_id, elapsed).with_link("self", "/api/v1/bots");

    Ok(Json(resp))
}

/// GET /api/v1/bots/:key - Get a bot by key.
pub async fn get_bot(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(key): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let bot = resolve_bot(&state, &auth, &key).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let bot_json = serde_json::to_value(&bot)
        .map_err(|e| AppError::Internal(e.to_string()))?;
    let resp = ApiResponse::success(bot_json, request_id, elapsed)
        .with_link("self", &format!("/api/v1/bots/{}", bot.key))
        .with_link("chat", &format!("/api/v1/bots/{}/chat", bot.key))
        .with_link("memory", &format!("/api/v1/bots/{}/memory", bot.key));

    Ok(Json(resp))
}

/// Fields a PUT may change. The key never changes; it anchors the credit
/// counter and the widget embed.
#[derive(Debug, serde::Deserialize)]
pub struct UpdateBotRequest {
    pub name: Option<String>,
    pub prompt: Option<String>,
    pub usage_limit: Option<u32>,
    pub embed_url: Option<String>,
}

/// PUT /api/v1/bots/:key - Update a bot.
pub async fn update_bot(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(key): Path<String>,
    Json(body): Json<UpdateBotRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let mut bot = resolve_bot(&state, &auth, &key).await?;
    if let Some(name) = body.name {
        bot.name = name;
    }
    if let Some(prompt) = body.prompt {
        bot.prompt = prompt;
    }
    if let Some(limit) = body.usage_limit {
        bot.usage_limit = resolve_usage_limit(&state.config, Some(limit));
    }
    if body.embed_url.is_some() {
        bot.embed_url = body.embed_url;
    }
    bot.updated_at = Utc::now();

    state.bot_repo.update(&bot).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let bot_json = serde_json::to_value(&bot)
        .map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(Json(ApiResponse::success(bot_json, request_id, elapsed)))
}

/// DELETE /api/v1/bots/:key - Delete a bot and its related records.
pub async fn delete_bot(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(key): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let bot = resolve_bot(&state, &auth, &key).await?;
    state.bot_repo.delete(&auth.owner, &bot.key).await?;
    // Transcript cleanup is best effort; an orphaned transcript row is
    // unreachable once the bot is gone.
    if let Err(err) = state.conversation_repo.clear(&auth.owner, &bot.key).await {
        tracing::warn!(error = %err, bot = %bot.key, "failed to clear transcript on delete");
    }

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(
        serde_json::json!({ "deleted": bot.key.to_string() }),
        request_id,
        elapsed,
    )))
}
