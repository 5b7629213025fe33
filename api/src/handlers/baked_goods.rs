use axum::{extract::State, http::StatusCode};
use std::str::FromStr;

use crate::extractors::{FormFields, IdPath};
use crate::handlers::{ErrorResponse, JsonBody, MessageResponse};
use crate::state::AppState;
use common::errors::ValidationError;
use common::models::{BakedGood, NewBakedGood};
use common::telemetry;

/// Form body accepted by `POST /baked_goods`.
///
/// Fields stay strings until every one is known to be present, so a missing
/// field is reported before a malformed one.
#[derive(Debug, Default)]
pub struct CreateBakedGoodForm {
    pub name: Option<String>,
    pub price: Option<String>,
    pub bakery_id: Option<String>,
}

impl From<FormFields> for CreateBakedGoodForm {
    fn from(mut fields: FormFields) -> Self {
        Self {
            name: fields.take("name"),
            price: fields.take("price"),
            bakery_id: fields.take("bakery_id"),
        }
    }
}

impl CreateBakedGoodForm {
    pub fn into_new_baked_good(self) -> Result<NewBakedGood, ValidationError> {
        let (Some(name), Some(price), Some(bakery_id)) = (
            non_empty(self.name),
            non_empty(self.price),
            non_empty(self.bakery_id),
        ) else {
            return Err(ValidationError::MissingFields(vec![
                "name".to_string(),
                "price".to_string(),
                "bakery_id".to_string(),
            ]));
        };

        Ok(NewBakedGood {
            name,
            price: parse_price(&price)?,
            bakery_id: parse_field("bakery_id", &bakery_id)?,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn invalid(field: &str, raw: &str) -> ValidationError {
    ValidationError::InvalidFieldValue {
        field: field.to_string(),
        value: raw.to_string(),
    }
}

fn parse_field<T: FromStr>(field: &str, raw: &str) -> Result<T, ValidationError> {
    raw.trim().parse().map_err(|_| invalid(field, raw))
}

/// Prices must be finite; `inf` and `nan` parse as `f64` but cannot be
/// written back as JSON numbers.
fn parse_price(raw: &str) -> Result<f64, ValidationError> {
    let price: f64 = parse_field("price", raw)?;
    if !price.is_finite() {
        return Err(invalid("price", raw));
    }
    Ok(price)
}

/// Create a baked good from form fields `name`, `price`, `bakery_id`
#[tracing::instrument(skip(state, fields))]
pub async fn create_baked_good(
    State(state): State<AppState>,
    fields: FormFields,
) -> Result<(StatusCode, JsonBody<BakedGood>), ErrorResponse> {
    let new_good = CreateBakedGoodForm::from(fields).into_new_baked_good()?;

    let good = state.store.create_baked_good(new_good).await?;

    telemetry::record_baked_good_created();
    tracing::info!(
        baked_good_id = good.id,
        bakery_id = good.bakery_id,
        price = good.price,
        "Baked good created"
    );
    Ok((StatusCode::CREATED, state.json(good)))
}

/// Delete a baked good
#[tracing::instrument(skip(state))]
pub async fn delete_baked_good(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> Result<JsonBody<MessageResponse>, ErrorResponse> {
    state
        .store
        .delete_baked_good(id)
        .await
        .map_err(|e| ErrorResponse::from_store(e, "Baked good not found"))?;

    telemetry::record_baked_good_deleted();
    tracing::info!(baked_good_id = id, "Baked good deleted");
    Ok(state.json(MessageResponse::new("Baked good successfully deleted")))
}

/// All baked goods, most expensive first
#[tracing::instrument(skip(state))]
pub async fn baked_goods_by_price(
    State(state): State<AppState>,
) -> Result<JsonBody<Vec<BakedGood>>, ErrorResponse> {
    let goods = state.store.list_baked_goods_by_price_desc().await?;

    Ok(state.json(goods))
}

/// The most expensive baked good
#[tracing::instrument(skip(state))]
pub async fn most_expensive_baked_good(
    State(state): State<AppState>,
) -> Result<JsonBody<BakedGood>, ErrorResponse> {
    let good = state
        .store
        .most_expensive_baked_good()
        .await?
        .ok_or_else(|| ErrorResponse::not_found("No baked goods found"))?;

    Ok(state.json(good))
}
