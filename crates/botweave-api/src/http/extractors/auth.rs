//! API key authentication extractor.
//!
//! Extracts and verifies API keys from:
//! - `Authorization: Bearer <key>` header
//! - `X-API-Key: <key>` header
//!
//! Keys are SHA-256 hashed and compared against the `api_keys` table. A
//! valid key resolves to the owner identity it was issued for; every
//! handler scopes its queries to that owner.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use sha2::{Digest, Sha256};
use sqlx::Row;

use botweave_types::bot::OwnerId;

use crate::http::error::AppError;
use crate::state::AppState;

/// Authenticated request identity. Extracting this validates the API key.
pub struct Authenticated {
    pub owner: OwnerId,
}

impl FromRequestParts<AppState> for Authenticated {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let api_key = extract_api_key(parts)?;
        let key_hash = hash_api_key(&api_key);

        let result = sqlx::query("SELECT owner FROM api_keys WHERE key_hash = ?")
            .bind(&key_hash)
            .fetch_optional(&state.db_pool.reader)
            .await
            .map_err(|e| AppError::Internal(format!("Database error: {e}")))?;

        match result {
            Some(row) => {
                let owner: String = row
                    .try_get("owner")
                    .map_err(|e| AppError::Internal(format!("Database error: {e}")))?;
                Ok(Authenticated {
                    owner: OwnerId::new(owner),
                })
            }
            None => Err(AppError::Unauthorized(
                "Invalid API key. Provide a valid key via 'Authorization: Bearer <key>' or 'X-API-Key: <key>' header.".to_string(),
            )),
        }
    }
}

/// Extract the API key from request headers.
fn extract_api_key(parts: &Parts) -> Result<String, AppError> {
    // Try Authorization: Bearer <key>
    if let Some(auth) = parts.headers.get("authorization") {
        let auth_str = auth.to_str().map_err(|_| {
            AppError::Unauthorized("Invalid Authorization header encoding".to_string())
        })?;
        if let Some(key) = auth_str.strip_prefix("Bearer ") {
            return Ok(key.trim().to_string());
        }
    }

    // Try X-API-Key header
    if let Some(key) = parts.headers.get("x-api-key") {
        let key_str = key
            .to_str()
            .map_err(|_| AppError::Unauthorized("Invalid X-API-Key header encoding".to_string()))?;
        return Ok(key_str.trim().to_string());
    }

    Err(AppError::Unauthorized(
        "Missing API key. Provide via 'Authorization: Bearer <key>' or 'X-API-Key: <key>' header.".to_string(),
    ))
}

/// Compute SHA-256 hash of an API key (lowercase hex).
pub fn hash_api_key(key: &str) -> String {
    let digest = Sha256::digest(key.as_bytes());
    format!("{digest:x}")
}

/// Generate a plaintext API key: `bwv_` plus two random v4 UUIDs, 244 bits
/// of entropy without a dedicated RNG dependency.
fn generate_api_key() -> String {
    format!(
        "bwv_{}{}",
        uuid::Uuid::new_v4().simple(),
        uuid::Uuid::new_v4().simple()
    )
}

/// Issue a new API key for an owner and store its hash.
///
/// Returns the plaintext key; it is shown once and never stored.
pub async fn issue_api_key(
    pool: &botweave_infra::sqlite::pool::DatabasePool,
    owner: &OwnerId,
    label: &str,
) -> anyhow::Result<String> {
    let plaintext_key = generate_api_key();
    let key_hash = hash_api_key(&plaintext_key);
    let now = chrono::Utc::now().to_rfc3339();

    sqlx::query("INSERT INTO api_keys (key_hash, owner, label, created_at) VALUES (?, ?, ?, ?)")
        .bind(&key_hash)
        .bind(owner.as_str())
        .bind(label)
        .bind(&now)
        .execute(&pool.writer)
        .await?;

    Ok(plaintext_key)
}
