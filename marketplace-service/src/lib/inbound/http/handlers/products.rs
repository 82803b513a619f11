use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use crate::domain::product::models::Product;
use crate::domain::product::models::ProductId;
use crate::inbound::http::handlers::ApiError;

pub mod browse;
pub mod create;
pub mod delete;
pub mod update;

/// Response body for product reads and writes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Product> for ProductResponse {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price,
            owner_id: product.owner_id.to_string(),
            created_at: product.created_at,
        }
    }
}

/// An id that does not parse can never match a stored product; it reports
/// the same 404 a missing row does.
pub(crate) fn parse_product_id(raw: &str) -> Result<ProductId, ApiError> {
    ProductId::from_string(raw)
        .map_err(|_| ApiError::NotFound(format!("Product not found with id: {}", raw)))
}
