use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

use super::errors::RoleParseError;

/// Role claim carried by every token.
///
/// Parsing is case-insensitive; the wire form is lowercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl FromStr for Role {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            _ => Err(RoleParseError(s.to_string())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Token payload.
///
/// All fields are mandatory; a token missing any of them fails
/// verification at the deserialization step.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// Subject (the user's email)
    pub sub: String,

    /// Role claim
    pub role: Role,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// Caller identity resolved from a verified token.
///
/// Produced fresh per request by the authentication gate and attached to
/// the request context; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Stable user key (email)
    pub subject: String,

    /// Role claim from the token
    pub role: Role,
}
