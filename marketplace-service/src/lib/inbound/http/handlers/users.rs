use auth::Identity;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::User;
use crate::inbound::http::handlers::ApiError;

pub mod login;
pub mod manage;
pub mod profile;
pub mod register;

/// Response body for user reads and writes. Never carries the password
/// hash.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.name.clone(),
            email: user.email.as_str().to_string(),
            role: user.role.to_string(),
            created_at: user.created_at,
        }
    }
}

/// The gate attaches a verified identity whose subject is an email; a
/// subject that no longer parses as one cannot belong to any stored user.
pub(crate) fn subject_email(identity: &Identity) -> Result<EmailAddress, ApiError> {
    EmailAddress::new(identity.subject.clone()).map_err(|_| ApiError::InvalidCredentials)
}
