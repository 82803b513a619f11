use async_trait::async_trait;

use crate::domain::user::errors::UserError;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;

/// Persistence operations for the user aggregate.
///
/// The store is an external collaborator; this trait is the seam. `save`
/// has insert-or-replace semantics keyed by id, and the store enforces a
/// unique index on email.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist a user, inserting or replacing by id.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - another user already holds this email
    /// * `StoreFailure` - store operation failed
    async fn save(&self, user: User) -> Result<User, UserError>;

    /// Retrieve a user by identifier.
    ///
    /// # Errors
    /// * `StoreFailure` - store operation failed
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;

    /// Retrieve a user by email address.
    ///
    /// # Errors
    /// * `StoreFailure` - store operation failed
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError>;

    /// Check whether any user holds this email.
    ///
    /// # Errors
    /// * `StoreFailure` - store operation failed
    async fn exists_by_email(&self, email: &EmailAddress) -> Result<bool, UserError>;

    /// Retrieve all users.
    ///
    /// # Errors
    /// * `StoreFailure` - store operation failed
    async fn list_all(&self) -> Result<Vec<User>, UserError>;

    /// Remove a user.
    ///
    /// # Errors
    /// * `NotFound` - user does not exist
    /// * `StoreFailure` - store operation failed
    async fn delete_by_id(&self, id: &UserId) -> Result<(), UserError>;
}
