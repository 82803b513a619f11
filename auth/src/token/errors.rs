use thiserror::Error;

/// Error type for token operations.
#[derive(Debug, Clone, Error)]
pub enum TokenError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token is malformed or has an invalid signature: {0}")]
    Malformed(String),

    #[error("Token is missing a subject")]
    MissingSubject,

    #[error("Token is expired")]
    Expired,
}

/// Error for unrecognized role strings.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unknown role: {0}")]
pub struct RoleParseError(pub String);
