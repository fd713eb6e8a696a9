//! Bookkeeping ledger handlers.

use std::time::Instant;

use axum::Json;
use axum::extract::{Query, State};
use serde::Deserialize;

use botweave_core::bookkeeping::TransactionRepository;
use botweave_types::ledger::{Transaction, TransactionKind};

use crate::http::error::AppError;
use crate::http::extractors::auth::Authenticated;
use crate::http::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct LedgerQuery {
    /// Optional `income`/`expense` filter.
    pub kind: Option<String>,
}

/// GET /api/v1/transactions - List the owner's ledger entries, newest
/// first.
pub async fn list_transactions(
    State(state): State<AppState>,
    auth: Authenticated,
    Query(query): Query<LedgerQuery>,
) -> Result<Json<ApiResponse<Vec<Transaction>>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let kind = match &query.kind {
        Some(s) => Some(
            s.parse::<TransactionKind>()
                .map_err(AppError::Validation)?,
        ),
        None => None,
    };

    let entries = state.ledger_repo.list(&auth.owner, kind).await?;

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(entries, request_id, elapsed)))
}
