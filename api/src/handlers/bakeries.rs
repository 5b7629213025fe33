use axum::extract::State;

use crate::extractors::{FormFields, IdPath};
use crate::handlers::{ErrorResponse, JsonBody};
use crate::state::AppState;
use common::errors::ValidationError;
use common::models::Bakery;
use common::telemetry;

const BAKERY_NOT_FOUND: &str = "Bakery not found";

/// Form body accepted by `PATCH /bakeries/:id`
#[derive(Debug, Default)]
pub struct UpdateBakeryForm {
    pub name: Option<String>,
}

impl From<FormFields> for UpdateBakeryForm {
    fn from(mut fields: FormFields) -> Self {
        Self {
            name: fields.take("name"),
        }
    }
}

impl UpdateBakeryForm {
    /// The new name, rejecting an absent or empty field
    pub fn into_name(self) -> Result<String, ValidationError> {
        self.name
            .filter(|name| !name.is_empty())
            .ok_or_else(|| ValidationError::MissingField("Name".to_string()))
    }
}

/// List all bakeries
#[tracing::instrument(skip(state))]
pub async fn list_bakeries(
    State(state): State<AppState>,
) -> Result<JsonBody<Vec<Bakery>>, ErrorResponse> {
    let bakeries = state.store.list_bakeries().await?;

    tracing::debug!(count = bakeries.len(), "Listed bakeries");
    Ok(state.json(bakeries))
}

/// Get a single bakery
#[tracing::instrument(skip(state))]
pub async fn get_bakery(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> Result<JsonBody<Bakery>, ErrorResponse> {
    let bakery = state
        .store
        .get_bakery(id)
        .await
        .map_err(|e| ErrorResponse::from_store(e, BAKERY_NOT_FOUND))?;

    Ok(state.json(bakery))
}

/// Rename a bakery from the form field `name`.
///
/// The bakery must exist before the form is looked at, so an unknown id is
/// a 404 even when `name` is missing.
#[tracing::instrument(skip(state, fields))]
pub async fn update_bakery(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    fields: FormFields,
) -> Result<JsonBody<Bakery>, ErrorResponse> {
    state
        .store
        .get_bakery(id)
        .await
        .map_err(|e| ErrorResponse::from_store(e, BAKERY_NOT_FOUND))?;

    let name = UpdateBakeryForm::from(fields).into_name()?;

    let bakery = state
        .store
        .update_bakery_name(id, &name)
        .await
        .map_err(|e| ErrorResponse::from_store(e, BAKERY_NOT_FOUND))?;

    telemetry::record_bakery_update();
    tracing::info!(bakery_id = id, bakery_name = %bakery.name, "Bakery updated");
    Ok(state.json(bakery))
}
