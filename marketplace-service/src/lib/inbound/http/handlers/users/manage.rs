//! Admin-only user management.
//!
//! The route table already gates this subtree to admins; each service call
//! re-asserts the role before touching the store.

use auth::Identity;
use auth::Role;
use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use serde::Deserialize;

use super::UserResponse;
use crate::domain::user::errors::UserError;
use crate::domain::user::models::AdminUpdateUserCommand;
use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::UserId;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiJson;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::router::AppState;
use crate::inbound::http::validation::letter_count;
use crate::inbound::http::validation::provided;
use crate::inbound::http::validation::FieldErrors;

/// GET /users
pub async fn list_users(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<ApiSuccess<Vec<UserResponse>>, ApiError> {
    state
        .user_service
        .list_users(Some(&identity))
        .await
        .map_err(ApiError::from)
        .map(|users| {
            ApiSuccess::new(
                StatusCode::OK,
                users.iter().map(UserResponse::from).collect(),
            )
        })
}

/// GET /users/:id
pub async fn get_user(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> Result<ApiSuccess<UserResponse>, ApiError> {
    let user_id = parse_user_id(&id)?;

    state
        .user_service
        .get_user(Some(&identity), &user_id)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::OK, user.into()))
}

/// POST /users
pub async fn create_user(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    ApiJson(body): ApiJson<AdminCreateUserRequest>,
) -> Result<ApiSuccess<UserResponse>, ApiError> {
    let command = body.try_into_command()?;

    state
        .user_service
        .create_user(Some(&identity), command)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::CREATED, user.into()))
}

/// PUT /users/:id
pub async fn update_user(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<AdminUpdateUserRequest>,
) -> Result<ApiSuccess<UserResponse>, ApiError> {
    let user_id = parse_user_id(&id)?;
    let command = body.try_into_command()?;

    state
        .user_service
        .update_user(Some(&identity), &user_id, command)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::OK, user.into()))
}

/// DELETE /users/:id
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let user_id = parse_user_id(&id)?;

    state
        .user_service
        .delete_user(Some(&identity), &user_id)
        .await
        .map_err(ApiError::from)
        .map(|_| StatusCode::NO_CONTENT)
}

/// Ids come from the path as opaque strings; one that does not parse can
/// never match a stored user, so it reports the same 404 a missing row
/// does.
fn parse_user_id(raw: &str) -> Result<UserId, ApiError> {
    UserId::from_string(raw)
        .map_err(|_| ApiError::NotFound(format!("User not found with id: {}", raw)))
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdminCreateUserRequest {
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
    role: Option<String>,
}

impl AdminCreateUserRequest {
    fn try_into_command(self) -> Result<CreateUserCommand, ApiError> {
        let mut errors = FieldErrors::new();

        let name = match self.name {
            Some(ref name) if letter_count(name) >= 3 => self.name.clone(),
            Some(_) => {
                errors.add("name", "Name must contain at least 3 letters.");
                None
            }
            None => {
                errors.add("name", "Name is required.");
                None
            }
        };

        let email = match self.email {
            Some(raw) => match EmailAddress::new(raw) {
                Ok(email) => Some(email),
                Err(_) => {
                    errors.add("email", "Email must be a well-formed email address.");
                    None
                }
            },
            None => {
                errors.add("email", "Email is required.");
                None
            }
        };

        let password = match self.password {
            Some(password) if password.chars().count() >= 8 => Some(password),
            Some(_) => {
                errors.add("password", "Password must be at least 8 characters.");
                None
            }
            None => {
                errors.add("password", "Password is required.");
                None
            }
        };

        errors.into_result()?;

        let role = parse_role(self.role.as_deref())?;

        // An empty collector implies every field parsed.
        match (name, email, password) {
            (Some(name), Some(email), Some(password)) => Ok(CreateUserCommand {
                name,
                email,
                password,
                role,
            }),
            _ => Err(ApiError::MalformedBody),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdminUpdateUserRequest {
    name: Option<String>,
    email: Option<String>,
    role: Option<String>,
}

impl AdminUpdateUserRequest {
    fn try_into_command(self) -> Result<AdminUpdateUserCommand, ApiError> {
        if provided(self.email).is_some() {
            return Err(UserError::EmailChangeNotAllowed.into());
        }

        let mut errors = FieldErrors::new();

        let name = provided(self.name);
        if let Some(ref name) = name {
            if letter_count(name) < 3 {
                errors.add("name", "Name must contain at least 3 letters.");
            }
        }

        errors.into_result()?;

        let role = match provided(self.role) {
            Some(raw) => Some(parse_role(Some(&raw))?),
            None => None,
        };

        Ok(AdminUpdateUserCommand { name, role })
    }
}

fn parse_role(raw: Option<&str>) -> Result<Role, ApiError> {
    raw.and_then(|value| value.parse::<Role>().ok())
        .ok_or_else(|| ApiError::validation_message("Role must be either 'admin' or 'user'."))
}
