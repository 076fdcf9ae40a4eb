//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST API routes for the aging and profitability reports
//! - Response types with amounts rendered as fixed two-place strings
//! - Mapping from report and store errors to JSON error responses

pub mod error;
pub mod routes;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::http::StatusCode;
use sea_orm::DatabaseConnection;
use tally_core::Clock;
use tally_shared::config::ReportingConfig;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// Source of "today" for reports without an explicit date.
    pub clock: Arc<dyn Clock>,
    /// Report defaults.
    pub reporting: ReportingConfig,
}

/// Creates the main application router.
pub fn create_router(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::GATEWAY_TIMEOUT,
            request_timeout,
        ))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
