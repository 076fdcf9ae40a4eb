//! Health check endpoints.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use tracing::warn;

use crate::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: &'static str,
    /// Service version.
    pub version: &'static str,
    /// Whether the ledger store answered a ping.
    pub ledger_store: &'static str,
}

/// Health check handler.
///
/// Reports 503 while the ledger store is unreachable, since no report can be served.
async fn health_check(State(state): State<AppState>) -> Response {
    let (status, ledger_store, code) = match state.db.ping().await {
        Ok(()) => ("healthy", "up", StatusCode::OK),
        Err(e) => {
            warn!(error = %e, "Ledger store ping failed");
            ("degraded", "down", StatusCode::SERVICE_UNAVAILABLE)
        }
    };

    (
        code,
        Json(HealthResponse {
            status,
            version: env!("CARGO_PKG_VERSION"),
            ledger_store,
        }),
    )
        .into_response()
}

/// Creates health check routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
