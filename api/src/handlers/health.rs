use axum::{extract::State, http::StatusCode, response::IntoResponse};

use crate::handlers::ErrorResponse;
use crate::state::AppState;

/// Health check endpoint; answers 503 when the store is unreachable
#[tracing::instrument(skip(state))]
pub async fn health_check(State(state): State<AppState>) -> Result<impl IntoResponse, ErrorResponse> {
    state.store.ping().await.map_err(|e| {
        tracing::error!(error = %e, "Health check failed");
        ErrorResponse::new("unavailable", e.message())
    })?;

    Ok((StatusCode::OK, "OK"))
}
