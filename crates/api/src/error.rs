//! Error responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tally_shared::AppError;
use tracing::{error, warn};

/// Renders an application error as a JSON response.
///
/// Server-side failures are logged with their details; the body only
/// carries the public code and message.
pub fn error_response(err: &AppError) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    if status.is_server_error() {
        error!(error = %err, code = err.error_code(), "Request failed");
    } else {
        warn!(error = %err, code = err.error_code(), "Request rejected");
    }

    (status, Json(err.body())).into_response()
}

/// Maps a failed blocking task into an internal error.
pub fn join_error(err: &tokio::task::JoinError) -> AppError {
    AppError::Internal(format!("report task failed: {err}"))
}
