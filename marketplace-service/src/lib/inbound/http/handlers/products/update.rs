use auth::Identity;
use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use serde::Deserialize;

use super::create::check_description;
use super::create::check_name;
use super::create::check_price;
use super::parse_product_id;
use super::ProductResponse;
use crate::domain::product::models::UpdateProductCommand;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiJson;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::router::AppState;
use crate::inbound::http::validation::provided;
use crate::inbound::http::validation::FieldErrors;

/// PUT /products/:id
pub async fn update_product(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<UpdateProductRequest>,
) -> Result<ApiSuccess<ProductResponse>, ApiError> {
    let product_id = parse_product_id(&id)?;
    let command = body.try_into_command()?;

    state
        .product_service
        .update_product(Some(&identity), &product_id, command)
        .await
        .map_err(ApiError::from)
        .map(|ref product| ApiSuccess::new(StatusCode::OK, product.into()))
}

/// HTTP request body for updating a product (raw JSON). All fields
/// optional; provided fields obey the creation constraints.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProductRequest {
    name: Option<String>,
    description: Option<String>,
    price: Option<f64>,
}

impl UpdateProductRequest {
    fn try_into_command(self) -> Result<UpdateProductCommand, ApiError> {
        let mut errors = FieldErrors::new();

        let name = provided(self.name);
        if let Some(ref name) = name {
            check_name(&mut errors, name);
        }

        let description = provided(self.description);
        if let Some(ref description) = description {
            check_description(&mut errors, description);
        }

        if let Some(price) = self.price {
            check_price(&mut errors, price);
        }

        errors.into_result()?;

        Ok(UpdateProductCommand {
            name,
            description,
            price: self.price,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_update_passes_through() {
        let command = UpdateProductRequest {
            name: Some("Renamed".to_string()),
            description: None,
            price: None,
        }
        .try_into_command()
        .unwrap();

        assert_eq!(command.name.as_deref(), Some("Renamed"));
        assert!(command.description.is_none());
        assert!(command.price.is_none());
    }

    #[test]
    fn test_provided_fields_are_validated() {
        let result = UpdateProductRequest {
            name: Some("x".to_string()),
            description: None,
            price: Some(-5.0),
        }
        .try_into_command();

        match result {
            Err(ApiError::Validation { fields, .. }) => {
                assert!(fields.contains_key("name"));
                assert!(fields.contains_key("price"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_no_fields_converts_to_empty_command() {
        let command = UpdateProductRequest {
            name: None,
            description: None,
            price: None,
        }
        .try_into_command()
        .unwrap();
        assert!(command.is_empty());
    }
}
