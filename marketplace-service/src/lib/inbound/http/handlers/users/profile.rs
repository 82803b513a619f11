use auth::Identity;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use serde::Deserialize;

use super::subject_email;
use super::UserResponse;
use crate::domain::user::errors::UserError;
use crate::domain::user::models::UpdateProfileCommand;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiJson;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::router::AppState;
use crate::inbound::http::validation::letter_count;
use crate::inbound::http::validation::provided;
use crate::inbound::http::validation::FieldErrors;

/// GET /users/me
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<ApiSuccess<UserResponse>, ApiError> {
    let email = subject_email(&identity)?;

    state
        .user_service
        .get_profile(&email)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::OK, user.into()))
}

/// PUT /users/me
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    ApiJson(body): ApiJson<UpdateProfileRequest>,
) -> Result<ApiSuccess<UserResponse>, ApiError> {
    let email = subject_email(&identity)?;
    let command = body.try_into_command()?;

    state
        .user_service
        .update_profile(&email, command)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::OK, user.into()))
}

/// DELETE /users/me
pub async fn delete_profile(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<StatusCode, ApiError> {
    let email = subject_email(&identity)?;

    state
        .user_service
        .delete_profile(&email)
        .await
        .map_err(ApiError::from)
        .map(|_| StatusCode::NO_CONTENT)
}

/// HTTP request body for profile updates (raw JSON).
///
/// Email and role are deliberately rejected rather than silently dropped;
/// empty strings count as "not provided".
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProfileRequest {
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
    role: Option<String>,
}

impl UpdateProfileRequest {
    fn try_into_command(self) -> Result<UpdateProfileCommand, ApiError> {
        if provided(self.email).is_some() {
            return Err(UserError::EmailChangeNotAllowed.into());
        }
        if provided(self.role).is_some() {
            return Err(UserError::RoleChangeNotAllowed.into());
        }

        let mut errors = FieldErrors::new();

        let name = provided(self.name);
        if let Some(ref name) = name {
            if letter_count(name) < 3 {
                errors.add("name", "Name must contain at least 3 letters.");
            }
        }

        let password = provided(self.password);
        if let Some(ref password) = password {
            if password.chars().count() < 8 {
                errors.add("password", "Password must be at least 8 characters.");
            }
        }

        errors.into_result()?;

        Ok(UpdateProfileCommand { name, password })
    }
}
