use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::handlers::{ErrorResponse, JsonBody};
use crate::state::AppState;

/// Re-render error bodies indented when `server.pretty_json` is enabled.
///
/// Success bodies are rendered by the handlers. Errors are rendered compact
/// and keep a copy of themselves in the response extensions, which is used
/// here. No body is buffered.
#[tracing::instrument(skip_all)]
pub async fn pretty_json_middleware(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let mut response = next.run(req).await;

    if !state.config.server.pretty_json {
        return response;
    }

    match response.extensions_mut().remove::<ErrorResponse>() {
        Some(error) => (response.status(), JsonBody::new(error, true)).into_response(),
        None => response,
    }
}
