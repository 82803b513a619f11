use auth::Identity;
use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::parse_product_id;
use super::ProductResponse;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::router::AppState;

/// GET /products (public)
pub async fn list_products(
    State(state): State<AppState>,
) -> Result<ApiSuccess<Vec<ProductResponse>>, ApiError> {
    state
        .product_service
        .list_products()
        .await
        .map_err(ApiError::from)
        .map(|products| {
            ApiSuccess::new(
                StatusCode::OK,
                products.iter().map(ProductResponse::from).collect(),
            )
        })
}

/// GET /products/:id (public)
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiSuccess<ProductResponse>, ApiError> {
    let product_id = parse_product_id(&id)?;

    state
        .product_service
        .get_product(&product_id)
        .await
        .map_err(ApiError::from)
        .map(|ref product| ApiSuccess::new(StatusCode::OK, product.into()))
}

/// GET /products/me
pub async fn my_products(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<ApiSuccess<Vec<ProductResponse>>, ApiError> {
    state
        .product_service
        .my_products(Some(&identity))
        .await
        .map_err(ApiError::from)
        .map(|products| {
            ApiSuccess::new(
                StatusCode::OK,
                products.iter().map(ProductResponse::from).collect(),
            )
        })
}
