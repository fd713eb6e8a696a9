//! Persistent memory handlers: the memory document and uploaded files.

use std::time::Instant;

use axum::Json;
use axum::extract::{Path, State};
use chrono::Utc;
use serde::Deserialize;

use botweave_core::memory::{MemoryRepository, merge_uploaded_file, remove_uploaded_file};
use botweave_types::memory::{BotMemory, ChartOfAccounts, UploadedFile, VendorDefault};

use crate::http::error::AppError;
use crate::http::extractors::auth::Authenticated;
use crate::http::handlers::bot::resolve_bot;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// GET /api/v1/bots/:key/memory - Read the memory document.
pub async fn get_memory(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(key): Path<String>,
) -> Result<Json<ApiResponse<BotMemory>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let bot = resolve_bot(&state, &auth, &key).await?;
    let memory = state
        .memory_repo
        .load(&auth.owner, &bot.key)
        .await?
        .unwrap_or_default();

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(memory, request_id, elapsed)))
}

/// Merge-update request for the bookkeeping reference data. Absent fields
/// keep their stored value.
#[derive(Debug, Deserialize)]
pub struct UpdateMemoryRequest {
    pub chart_of_accounts: Option<ChartOfAccounts>,
    pub vendor_defaults: Option<std::collections::BTreeMap<String, VendorDefault>>,
}

/// PUT /api/v1/bots/:key/memory - Merge-update the memory document.
pub async fn update_memory(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(key): Path<String>,
    Json(body): Json<UpdateMemoryRequest>,
) -> Result<Json<ApiResponse<BotMemory>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let bot = resolve_bot(&state, &auth, &key).await?;
    let mut memory = state
        .memory_repo
        .load(&auth.owner, &bot.key)
        .await?
        .unwrap_or_default();

    if let Some(chart) = body.chart_of_accounts {
        memory.chart_of_accounts = chart;
    }
    if let Some(defaults) = body.vendor_defaults {
        memory.vendor_defaults = defaults;
    }

    state.memory_repo.save(&auth.owner, &bot.key, &memory).await?;

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(memory, request_id, elapsed)))
}

#[derive(Debug, Deserialize)]
pub struct UploadFileRequest {
    pub file_name: String,
    pub content: String,
}

/// POST /api/v1/bots/:key/memory/files - Upload (or replace) a reference
/// file.
pub async fn upload_file(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(key): Path<String>,
    Json(body): Json<UploadFileRequest>,
) -> Result<Json<ApiResponse<BotMemory>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    if body.file_name.trim().is_empty() {
        return Err(AppError::Validation("file_name must not be empty".to_string()));
    }

    let bot = resolve_bot(&state, &auth, &key).await?;
    let mut memory = state
        .memory_repo
        .load(&auth.owner, &bot.key)
        .await?
        .unwrap_or_default();

    merge_uploaded_file(
        &mut memory,
        UploadedFile {
            file_name: body.file_name,
            content: body.content,
            uploaded_at: Utc::now(),
        },
    );

    state.memory_repo.save(&auth.owner, &bot.key, &memory).await?;

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(memory, request_id, elapsed)))
}

/// DELETE /api/v1/bots/:key/memory/files/:name - Remove a reference file.
pub async fn delete_file(
    State(state): State<AppState>,
    auth: Authenticated,
    Path((key, name)): Path<(String, String)>,
) -> Result<Json<ApiResponse<BotMemory>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let bot = resolve_bot(&state, &auth, &key).await?;
    let mut memory = state
        .memory_repo
        .load(&auth.owner, &bot.key)
        .await?
        .unwrap_or_default();

    if !remove_uploaded_file(&mut memory, &name) {
        return Err(AppError::Validation(format!("no uploaded file named '{name}'")));
    }

    state.memory_repo.save(&auth.owner, &bot.key, &memory).await?;

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(memory, request_id, elapsed)))
}
