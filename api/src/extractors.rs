// Custom Axum extractors

use std::collections::HashMap;
use std::convert::Infallible;

use axum::async_trait;
use axum::extract::{FromRequest, FromRequestParts, Multipart, Path, Request};
use axum::http::{header, request::Parts, HeaderMap};
use axum::Form;

use crate::handlers::ErrorResponse;

/// Integer id taken from the `:id` route segment.
///
/// Only unsigned decimal digits match; anything else is treated as an
/// unknown route and answered with 404.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdPath(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for IdPath
where
    S: Send + Sync,
{
    type Rejection = ErrorResponse;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| ErrorResponse::not_found("Not found"))?;

        parse_route_id(&raw)
            .map(IdPath)
            .ok_or_else(|| ErrorResponse::not_found("Not found"))
    }
}

/// Parse a route id: non-empty ASCII digits that fit in an i64
pub fn parse_route_id(raw: &str) -> Option<i64> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

/// Text fields of a form body, URL-encoded or `multipart/form-data`.
///
/// The first value of a repeated key wins. Uploaded files are skipped. A
/// body of any other type, or one that fails to parse, yields no fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields(HashMap<String, String>);

impl FormFields {
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut fields = HashMap::new();
        for (key, value) in pairs {
            fields.entry(key.into()).or_insert_with(|| value.into());
        }
        Self(fields)
    }

    /// Remove and return the value of `key`
    pub fn take(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }
}

#[async_trait]
impl<S> FromRequest<S> for FormFields
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if is_multipart(req.headers()) {
            return Ok(read_multipart(req, state).await);
        }

        match Form::<Vec<(String, String)>>::from_request(req, state).await {
            Ok(Form(pairs)) => Ok(Self::from_pairs(pairs)),
            Err(rejection) => {
                tracing::debug!(error = %rejection, "Request carries no form body");
                Ok(Self::default())
            }
        }
    }
}

fn is_multipart(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.starts_with("multipart/form-data"))
        .unwrap_or(false)
}

async fn read_multipart<S>(req: Request, state: &S) -> FormFields
where
    S: Send + Sync,
{
    let mut multipart = match Multipart::from_request(req, state).await {
        Ok(multipart) => multipart,
        Err(e) => {
            tracing::warn!(error = %e, "Could not read multipart body");
            return FormFields::default();
        }
    };

    let mut pairs = Vec::new();
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(error = %e, "Malformed multipart body");
                break;
            }
        };

        if field.file_name().is_some() {
            continue;
        }
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        match field.text().await {
            Ok(value) => pairs.push((name, value)),
            Err(e) => {
                tracing::warn!(error = %e, field = %name, "Could not read multipart field");
                break;
            }
        }
    }

    FormFields::from_pairs(pairs)
}
