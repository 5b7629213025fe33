pub mod baked_goods;
pub mod bakeries;
pub mod health;
pub mod index;
pub mod metrics;

// Common response types
use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use common::errors::{DatabaseError, ValidationError};
use common::telemetry;
use serde::Serialize;

/// JSON response body, indented or compact.
///
/// Serialised straight from the value, so large listings are never
/// buffered twice.
#[derive(Debug)]
pub struct JsonBody<T> {
    value: T,
    pretty: bool,
}

impl<T: Serialize> JsonBody<T> {
    pub fn new(value: T, pretty: bool) -> Self {
        Self { value, pretty }
    }
}

impl<T: Serialize> IntoResponse for JsonBody<T> {
    fn into_response(self) -> Response {
        let rendered = if self.pretty {
            serde_json::to_vec_pretty(&self.value)
        } else {
            serde_json::to_vec(&self.value)
        };

        match rendered {
            Ok(bytes) => (
                [(header::CONTENT_TYPE, HeaderValue::from_static("application/json"))],
                bytes,
            )
                .into_response(),
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize response body");
                ErrorResponse::new("internal_error", "Failed to render response").into_response()
            }
        }
    }
}

/// Error body returned by every handler: `{"error": "<message>"}`
///
/// The rendered response keeps a copy of the error in its extensions so the
/// router can re-render it indented.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    #[serde(skip)]
    pub kind: &'static str,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(kind: &'static str, message: impl Into<String>) -> Self {
        Self {
            kind,
            error: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new("not_found", message)
    }

    /// Map a store failure, using `not_found_message` when the row is missing.
    ///
    /// Any other failure exposes the store's own message with a 400.
    pub fn from_store(err: DatabaseError, not_found_message: &str) -> Self {
        if err.is_not_found() {
            return Self::not_found(not_found_message);
        }

        tracing::warn!(error = %err, kind = err.kind(), "Store operation failed");
        telemetry::record_store_error(err.kind());
        Self::new("store_error", err.message())
    }

    pub fn status(&self) -> StatusCode {
        match self.kind {
            "not_found" => StatusCode::NOT_FOUND,
            "validation_error" | "store_error" => StatusCode::BAD_REQUEST,
            "unavailable" => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut response = (status, JsonBody::new(&self, false)).into_response();
        response.extensions_mut().insert(self);
        response
    }
}

impl From<ValidationError> for ErrorResponse {
    fn from(err: ValidationError) -> Self {
        Self::new("validation_error", err.to_string())
    }
}

impl From<DatabaseError> for ErrorResponse {
    fn from(err: DatabaseError) -> Self {
        Self::from_store(err, "Not found")
    }
}

/// Plain confirmation body: `{"message": "<text>"}`
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Fallback for paths that match no route
#[tracing::instrument]
pub async fn not_found() -> ErrorResponse {
    ErrorResponse::not_found("Not found")
}
