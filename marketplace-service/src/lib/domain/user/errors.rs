use thiserror::Error;

use crate::domain::access::AccessError;

/// Error for UserId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Top-level error for all user-related operations
#[derive(Debug, Clone, Error)]
pub enum UserError {
    #[error("{0}")]
    NotFound(String),

    #[error("User with the given email already exists.")]
    EmailAlreadyExists,

    #[error("Email update is not allowed.")]
    EmailChangeNotAllowed,

    #[error("Role update is not allowed.")]
    RoleChangeNotAllowed,

    #[error("No fields provided to update.")]
    NothingToUpdate,

    #[error(transparent)]
    Access(#[from] AccessError),

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    // Infrastructure errors
    #[error("Store error: {0}")]
    StoreFailure(String),
}
