use auth::Identity;
use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::parse_product_id;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

/// DELETE /products/:id
pub async fn delete_product(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let product_id = parse_product_id(&id)?;

    state
        .product_service
        .delete_product(Some(&identity), &product_id)
        .await
        .map_err(ApiError::from)
        .map(|_| StatusCode::NO_CONTENT)
}
