use auth::Role;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

use super::UserResponse;
use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::EmailAddress;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiJson;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::router::AppState;
use crate::inbound::http::validation::letter_count;
use crate::inbound::http::validation::FieldErrors;

pub async fn register(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<RegisterRequest>,
) -> Result<ApiSuccess<UserResponse>, ApiError> {
    let command = body.try_into_command()?;

    state
        .user_service
        .register(command)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::CREATED, user.into()))
}

/// HTTP request body for registration (raw JSON).
///
/// A `role` field is accepted for shape-compatibility and ignored: public
/// registration always produces a plain user.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
    #[allow(dead_code)]
    role: Option<String>,
}

impl RegisterRequest {
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

        // An empty collector implies every field parsed.
        match (name, email, password) {
            (Some(name), Some(email), Some(password)) => Ok(CreateUserCommand {
                name,
                email,
                password,
                role: Role::User,
            }),
            _ => Err(ApiError::MalformedBody),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            name: Some(name.to_string()),
            email: Some(email.to_string()),
            password: Some(password.to_string()),
            role: None,
        }
    }

    #[test]
    fn test_valid_request_converts() {
        let command = request("Alice", "a@x.com", "longenough1")
            .try_into_command()
            .unwrap();
        assert_eq!(command.name, "Alice");
        assert_eq!(command.email.as_str(), "a@x.com");
        assert_eq!(command.role, Role::User);
    }

    #[test]
    fn test_role_in_payload_is_ignored() {
        let mut raw = request("Alice", "a@x.com", "longenough1");
        raw.role = Some("admin".to_string());
        let command = raw.try_into_command().unwrap();
        assert_eq!(command.role, Role::User);
    }

    #[test]
    fn test_all_violations_collected() {
        let result = RegisterRequest {
            name: Some("12".to_string()),
            email: Some("not-an-email".to_string()),
            password: Some("short".to_string()),
            role: None,
        }
        .try_into_command();

        match result {
            Err(ApiError::Validation { fields, .. }) => {
                assert!(fields.contains_key("name"));
                assert!(fields.contains_key("email"));
                assert!(fields.contains_key("password"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_fields_reported() {
        let result = RegisterRequest {
            name: None,
            email: None,
            password: None,
            role: None,
        }
        .try_into_command();

        match result {
            Err(ApiError::Validation { fields, .. }) => {
                assert_eq!(fields.len(), 3);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }
}
