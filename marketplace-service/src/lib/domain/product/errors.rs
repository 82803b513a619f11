use thiserror::Error;

use crate::domain::access::AccessError;
use crate::domain::user::errors::UserError;

/// Error for ProductId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProductIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Top-level error for all product-related operations
#[derive(Debug, Clone, Error)]
pub enum ProductError {
    #[error("{0}")]
    NotFound(String),

    #[error("Product with the same name, description, and price already exists.")]
    Duplicate,

    #[error("No fields provided to update.")]
    NothingToUpdate,

    /// Ownership or role denial, with the operation-specific message the
    /// wire contract fixes.
    #[error("{0}")]
    PermissionDenied(String),

    #[error(transparent)]
    Access(#[from] AccessError),

    // Infrastructure errors
    #[error("Store error: {0}")]
    StoreFailure(String),
}

impl From<UserError> for ProductError {
    fn from(err: UserError) -> Self {
        match err {
            // A caller whose user row is gone is no longer authenticated.
            UserError::NotFound(_) => ProductError::Access(AccessError::Unauthenticated),
            UserError::StoreFailure(msg) => ProductError::StoreFailure(msg),
            other => ProductError::StoreFailure(other.to_string()),
        }
    }
}
