//! Axum router configuration with middleware.
//!
//! All routes are under `/api/v1/`.
//! Middleware: CORS, tracing.

use axum::Router;
use axum::routing::{delete, get, post, put};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Bot CRUD
        .route("/bots", post(handlers::bot::create_bot))
        .route("/bots", get(handlers::bot::list_bots))
        .route("/bots/{key}", get(handlers::bot::get_bot))
        .route("/bots/{key}", put(handlers::bot::update_bot))
        .route("/bots/{key}", delete(handlers::bot::delete_bot))
        // Conversation
        .route("/bots/{key}/chat", post(handlers::chat::submit_turn))
        .route("/bots/{key}/chat", get(handlers::chat::get_transcript))
        .route("/bots/{key}/chat/clear", post(handlers::chat::clear_transcript))
        .route("/bots/{key}/summary", get(handlers::chat::summarize_chat))
        // Metering
        .route("/bots/{key}/usage", get(handlers::usage::get_usage))
        // Persistent memory
        .route(
            "/bots/{key}/memory",
            get(handlers::memory::get_memory).put(handlers::memory::update_memory),
        )
        .route("/bots/{key}/memory/files", post(handlers::memory::upload_file))
        .route(
            "/bots/{key}/memory/files/{name}",
            delete(handlers::memory::delete_file),
        )
        // Booking wizard
        .route("/bots/{key}/booking", post(handlers::booking::advance_booking))
        .route(
            "/bots/{key}/booking/reset",
            post(handlers::booking::reset_booking),
        )
        // Ledger
        .route("/transactions", get(handlers::ledger::list_transactions));

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - Simple health check endpoint (no auth required).
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
