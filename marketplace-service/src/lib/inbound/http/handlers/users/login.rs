use axum::extract::State;
use axum::http::StatusCode;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::domain::user::errors::UserError;
use crate::domain::user::models::EmailAddress;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiJson;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::router::AppState;
use crate::inbound::http::validation::FieldErrors;

/// Every credential failure below collapses into the same 401: the
/// response must not reveal whether the email exists, whether the password
/// was wrong, or whether the stored digest is unreadable.
pub async fn login(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<LoginRequest>,
) -> Result<ApiSuccess<LoginResponse>, ApiError> {
    let (email, password) = body.validated()?;

    let email = EmailAddress::new(email).map_err(|_| ApiError::InvalidCredentials)?;

    let user = state
        .user_service
        .get_user_by_email(&email)
        .await
        .map_err(|e| match e {
            UserError::NotFound(_) => ApiError::InvalidCredentials,
            other => ApiError::from(other),
        })?;

    let result = state
        .authenticator
        .authenticate(
            &password,
            &user.password_hash,
            user.email.as_str(),
            user.role,
            Utc::now(),
        )
        .map_err(|e| match e {
            auth::AuthenticationError::InvalidCredentials => ApiError::InvalidCredentials,
            auth::AuthenticationError::PasswordError(err) => ApiError::Internal(err.to_string()),
            auth::AuthenticationError::TokenError(err) => ApiError::Internal(err.to_string()),
        })?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        LoginResponse {
            token: result.access_token,
            message: "Login successful!".to_string(),
        },
    ))
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    email: Option<String>,
    password: Option<String>,
}

impl LoginRequest {
    fn validated(self) -> Result<(String, String), ApiError> {
        let mut errors = FieldErrors::new();

        if self.email.as_deref().unwrap_or("").is_empty() {
            errors.add("email", "Email is required.");
        }
        if self.password.as_deref().unwrap_or("").is_empty() {
            errors.add("password", "Password is required.");
        }

        errors.into_result()?;

        Ok((
            self.email.unwrap_or_default(),
            self.password.unwrap_or_default(),
        ))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub message: String,
}
