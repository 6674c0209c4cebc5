//! Axum route handlers for the trust status API.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use sentinel_checker::{LedgerClient, TrustChecker};
use sentinel_core::PassReport;

// ── Response types ────────────────────────────────────────────────────────────

/// Body of `GET /status`.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    /// `false` once any consistency failure has been observed.
    pub trusted: bool,
    /// The most recent scanned pass, if any pass has run yet.
    pub last_pass: Option<PassReport>,
}

// ── Router ────────────────────────────────────────────────────────────────────

/// Build the application router over a shared checker.
pub fn create_router<C: LedgerClient + 'static>(checker: Arc<TrustChecker<C>>) -> Router {
    Router::new()
        .route("/status", get(status::<C>))
        .route("/health", get(health))
        .with_state(checker)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

// ── Handlers ──────────────────────────────────────────────────────────────────

/// `GET /health` — liveness check.
pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({"status": "ok"})))
}

/// `GET /status` — current trust signal and the latest pass summary.
pub async fn status<C: LedgerClient + 'static>(
    State(checker): State<Arc<TrustChecker<C>>>,
) -> Json<StatusResponse> {
    Json(StatusResponse { trusted: checker.status(), last_pass: checker.last_pass() })
}
