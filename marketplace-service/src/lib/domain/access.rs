//! Authorization policy.
//!
//! Two predicates cover every protected operation: a role gate and an
//! ownership gate. Both are pure functions of the caller and the target;
//! the ownership fact they consume must be read fresh from the store for
//! each decision.

use auth::Identity;
use auth::Role;
use thiserror::Error;

use crate::domain::user::models::UserId;

/// A token identity resolved against the user store.
///
/// The gate only proves who signed in; operations that compare against
/// resource ownership need the caller's stored id and current role, looked
/// up by email at decision time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub id: UserId,
    pub role: Role,
}

/// Authorization failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AccessError {
    /// No identity, or the identity no longer resolves to a stored user.
    #[error("User not authenticated")]
    Unauthenticated,

    /// Identity is valid but lacks the required role or ownership.
    #[error("Access denied")]
    Forbidden,
}

/// Allow only callers whose role is in `allowed`.
///
/// An absent identity denies rather than asking for login: these routes sit
/// behind the authentication gate, so a missing identity here means the
/// caller authenticated but holds no qualifying role.
pub fn require_role(identity: Option<&Identity>, allowed: &[Role]) -> Result<(), AccessError> {
    let identity = identity.ok_or(AccessError::Forbidden)?;

    if allowed.contains(&identity.role) {
        Ok(())
    } else {
        Err(AccessError::Forbidden)
    }
}

/// Allow only the resource owner or an admin.
pub fn require_owner_or_admin(caller: Option<&Caller>, owner: &UserId) -> Result<(), AccessError> {
    let caller = caller.ok_or(AccessError::Unauthenticated)?;

    if caller.id == *owner || caller.role == Role::Admin {
        Ok(())
    } else {
        Err(AccessError::Forbidden)
    }
}
