use auth::Identity;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use serde::Deserialize;

use super::ProductResponse;
use crate::domain::product::models::CreateProductCommand;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiJson;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::router::AppState;
use crate::inbound::http::validation::letter_count;
use crate::inbound::http::validation::FieldErrors;

/// POST /products
pub async fn create_product(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    ApiJson(body): ApiJson<CreateProductRequest>,
) -> Result<ApiSuccess<ProductResponse>, ApiError> {
    let command = body.try_into_command()?;

    state
        .product_service
        .create_product(Some(&identity), command)
        .await
        .map_err(ApiError::from)
        .map(|ref product| ApiSuccess::new(StatusCode::CREATED, product.into()))
}

/// HTTP request body for creating a product (raw JSON). The owner is never
/// part of the payload.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProductRequest {
    name: Option<String>,
    description: Option<String>,
    price: Option<f64>,
}

pub(super) fn check_name(errors: &mut FieldErrors, name: &str) {
    let length = name.chars().count();
    if !(2..=64).contains(&length) {
        errors.add("name", "Name must be between 2 and 64 characters.");
    } else if letter_count(name) < 3 {
        errors.add("name", "Name must contain at least 3 letters.");
    }
}

pub(super) fn check_description(errors: &mut FieldErrors, description: &str) {
    if description.trim().is_empty() {
        errors.add("description", "Description must not be blank.");
    } else if description.chars().count() > 225 {
        errors.add("description", "Description must be at most 225 characters.");
    }
}

pub(super) fn check_price(errors: &mut FieldErrors, price: f64) {
    // NaN fails this comparison too.
    if !(price >= 0.0) {
        errors.add("price", "Price must be at least 0.");
    }
}

impl CreateProductRequest {
    fn try_into_command(self) -> Result<CreateProductCommand, ApiError> {
        let mut errors = FieldErrors::new();

        match self.name {
            Some(ref name) => check_name(&mut errors, name),
            None => errors.add("name", "Name is required."),
        }
        match self.description {
            Some(ref description) => check_description(&mut errors, description),
            None => errors.add("description", "Description is required."),
        }
        match self.price {
            Some(price) => check_price(&mut errors, price),
            None => errors.add("price", "Price is required."),
        }

        errors.into_result()?;

        Ok(CreateProductCommand {
            name: self.name.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            price: self.price.unwrap_or_default(),
        })
    }
}
