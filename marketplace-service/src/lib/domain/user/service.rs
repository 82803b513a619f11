use std::sync::Arc;

use auth::Identity;
use auth::Role;
use chrono::Utc;

use crate::domain::access;
use crate::domain::user::errors::UserError;
use crate::domain::user::models::AdminUpdateUserCommand;
use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::UpdateProfileCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;

/// Domain service for user operations.
///
/// Self-service operations are scoped to the caller's own email, so they
/// need no ownership check. The admin operations re-assert the role gate at
/// their top even though the route table already enforces it; both checks
/// are cheap and each is testable on its own.
pub struct UserService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    password_hasher: auth::PasswordHasher,
}

impl<UR> UserService<UR>
where
    UR: UserRepository,
{
    pub fn new(repository: Arc<UR>) -> Self {
        Self {
            repository,
            password_hasher: auth::PasswordHasher::new(),
        }
    }

    /// Register a new account.
    ///
    /// The requested role is ignored: public registration always produces a
    /// plain user. Duplicate emails conflict.
    pub async fn register(&self, command: CreateUserCommand) -> Result<User, UserError> {
        if self.repository.exists_by_email(&command.email).await? {
            return Err(UserError::EmailAlreadyExists);
        }

        let password_hash = self
            .password_hasher
            .hash(&command.password)
            .map_err(|e| UserError::Hashing(e.to_string()))?;

        let user = User {
            id: UserId::new(),
            name: command.name,
            email: command.email,
            password_hash,
            role: Role::User,
            created_at: Utc::now(),
        };

        let created = self.repository.save(user).await?;
        tracing::info!(user_id = %created.id, "User registered");

        Ok(created)
    }

    /// Look up a user by email for credential verification.
    pub async fn get_user_by_email(&self, email: &EmailAddress) -> Result<User, UserError> {
        self.repository
            .find_by_email(email)
            .await?
            .ok_or_else(|| UserError::NotFound("User not found.".to_string()))
    }

    /// The caller's own profile.
    pub async fn get_profile(&self, subject: &EmailAddress) -> Result<User, UserError> {
        self.get_user_by_email(subject).await
    }

    /// Partial update of the caller's own profile (name and/or password).
    ///
    /// An update providing no fields is rejected, after the existence check.
    pub async fn update_profile(
        &self,
        subject: &EmailAddress,
        command: UpdateProfileCommand,
    ) -> Result<User, UserError> {
        let mut user = self.get_user_by_email(subject).await?;

        if command.is_empty() {
            return Err(UserError::NothingToUpdate);
        }

        if let Some(name) = command.name {
            user.name = name;
        }

        if let Some(password) = command.password {
            user.password_hash = self
                .password_hasher
                .hash(&password)
                .map_err(|e| UserError::Hashing(e.to_string()))?;
        }

        self.repository.save(user).await
    }

    /// Delete the caller's own account.
    pub async fn delete_profile(&self, subject: &EmailAddress) -> Result<(), UserError> {
        let user = self.get_user_by_email(subject).await?;
        self.repository.delete_by_id(&user.id).await?;
        tracing::info!(user_id = %user.id, "User deleted own account");
        Ok(())
    }

    /// Admin: list every user.
    pub async fn list_users(&self, identity: Option<&Identity>) -> Result<Vec<User>, UserError> {
        access::require_role(identity, &[Role::Admin])?;
        self.repository.list_all().await
    }

    /// Admin: fetch a user by id.
    pub async fn get_user(
        &self,
        identity: Option<&Identity>,
        id: &UserId,
    ) -> Result<User, UserError> {
        access::require_role(identity, &[Role::Admin])?;
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| UserError::NotFound(format!("User not found with id: {}", id)))
    }

    /// Admin: create a user with an explicit role.
    pub async fn create_user(
        &self,
        identity: Option<&Identity>,
        command: CreateUserCommand,
    ) -> Result<User, UserError> {
        access::require_role(identity, &[Role::Admin])?;

        if self.repository.exists_by_email(&command.email).await? {
            return Err(UserError::EmailAlreadyExists);
        }

        let password_hash = self
            .password_hasher
            .hash(&command.password)
            .map_err(|e| UserError::Hashing(e.to_string()))?;

        let user = User {
            id: UserId::new(),
            name: command.name,
            email: command.email,
            password_hash,
            role: command.role,
            created_at: Utc::now(),
        };

        self.repository.save(user).await
    }

    /// Admin: partial update of any user (name and/or role).
    ///
    /// Existence is checked before anything else; the empty-update
    /// rejection comes second.
    pub async fn update_user(
        &self,
        identity: Option<&Identity>,
        id: &UserId,
        command: AdminUpdateUserCommand,
    ) -> Result<User, UserError> {
        access::require_role(identity, &[Role::Admin])?;

        let mut user = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| UserError::NotFound("User not found.".to_string()))?;

        if command.is_empty() {
            return Err(UserError::NothingToUpdate);
        }

        if let Some(name) = command.name {
            user.name = name;
        }

        if let Some(role) = command.role {
            user.role = role;
        }

        self.repository.save(user).await
    }

    /// Admin: delete a user by id.
    pub async fn delete_user(
        &self,
        identity: Option<&Identity>,
        id: &UserId,
    ) -> Result<(), UserError> {
        access::require_role(identity, &[Role::Admin])?;

        if self.repository.find_by_id(id).await?.is_none() {
            return Err(UserError::NotFound("User not found.".to_string()));
        }

        self.repository.delete_by_id(id).await
    }

    /// Ensure the bootstrap admin account exists.
    ///
    /// Idempotent: if any user holds the configured email the call is a
    /// no-op. The password hash is stored as given; it was encoded outside
    /// the process.
    pub async fn ensure_admin(
        &self,
        email: &EmailAddress,
        password_hash: &str,
    ) -> Result<(), UserError> {
        if self.repository.exists_by_email(email).await? {
            return Ok(());
        }

        let admin = User {
            id: UserId::new(),
            name: "SuperAdmin".to_string(),
            email: email.clone(),
            password_hash: password_hash.to_string(),
            role: Role::Admin,
            created_at: Utc::now(),
        };

        self.repository.save(admin).await?;
        tracing::info!(email = %email, "Bootstrap admin created");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use mockall::mock;
    use mockall::predicate::*;

    use super::*;
    use crate::domain::access::AccessError;

    mock! {
        pub TestUserRepository {}

        #[async_trait]
        impl UserRepository for TestUserRepository {
            async fn save(&self, user: User) -> Result<User, UserError>;
            async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;
            async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError>;
            async fn exists_by_email(&self, email: &EmailAddress) -> Result<bool, UserError>;
            async fn list_all(&self) -> Result<Vec<User>, UserError>;
            async fn delete_by_id(&self, id: &UserId) -> Result<(), UserError>;
        }
    }

    fn email(s: &str) -> EmailAddress {
        EmailAddress::new(s.to_string()).unwrap()
    }

    fn identity(role: Role) -> Identity {
        Identity {
            subject: "caller@example.com".to_string(),
            role,
        }
    }

    fn stored_user(role: Role) -> User {
        User {
            id: UserId::new(),
            name: "Test User".to_string(),
            email: email("test@example.com"),
            password_hash: "$argon2id$test_hash".to_string(),
            role,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_register_hashes_password_and_forces_user_role() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_exists_by_email()
            .times(1)
            .returning(|_| Ok(false));
        repository
            .expect_save()
            .withf(|user| {
                user.role == Role::User
                    && user.password_hash.starts_with("$argon2")
                    && user.password_hash != "longenough1"
            })
            .times(1)
            .returning(|user| Ok(user));

        let service = UserService::new(Arc::new(repository));

        let created = service
            .register(CreateUserCommand {
                name: "Alice".to_string(),
                email: email("a@x.com"),
                password: "longenough1".to_string(),
                // A forged role in the registration payload must not stick.
                role: Role::Admin,
            })
            .await
            .unwrap();

        assert_eq!(created.role, Role::User);
    }

    #[tokio::test]
    async fn test_register_duplicate_email_conflicts_without_saving() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_exists_by_email()
            .times(1)
            .returning(|_| Ok(true));
        repository.expect_save().times(0);

        let service = UserService::new(Arc::new(repository));

        let result = service
            .register(CreateUserCommand {
                name: "Alice".to_string(),
                email: email("a@x.com"),
                password: "longenough1".to_string(),
                role: Role::User,
            })
            .await;

        assert!(matches!(result, Err(UserError::EmailAlreadyExists)));
    }

    #[tokio::test]
    async fn test_update_profile_not_found() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(None));

        let service = UserService::new(Arc::new(repository));

        let result = service
            .update_profile(
                &email("gone@example.com"),
                UpdateProfileCommand {
                    name: Some("New Name".to_string()),
                    password: None,
                },
            )
            .await;

        assert!(matches!(result, Err(UserError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_profile_empty_command_rejected_after_lookup() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(Some(stored_user(Role::User))));
        repository.expect_save().times(0);

        let service = UserService::new(Arc::new(repository));

        let result = service
            .update_profile(
                &email("test@example.com"),
                UpdateProfileCommand {
                    name: None,
                    password: None,
                },
            )
            .await;

        assert!(matches!(result, Err(UserError::NothingToUpdate)));
    }

    #[tokio::test]
    async fn test_update_profile_rehashes_new_password() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(Some(stored_user(Role::User))));
        repository
            .expect_save()
            .withf(|user| {
                user.password_hash.starts_with("$argon2")
                    && user.password_hash != "$argon2id$test_hash"
            })
            .times(1)
            .returning(|user| Ok(user));

        let service = UserService::new(Arc::new(repository));

        let updated = service
            .update_profile(
                &email("test@example.com"),
                UpdateProfileCommand {
                    name: None,
                    password: Some("brand_new_password".to_string()),
                },
            )
            .await
            .unwrap();

        assert_ne!(updated.password_hash, "$argon2id$test_hash");
    }

    #[tokio::test]
    async fn test_list_users_denied_for_non_admin() {
        let mut repository = MockTestUserRepository::new();
        repository.expect_list_all().times(0);

        let service = UserService::new(Arc::new(repository));

        let caller = identity(Role::User);
        let result = service.list_users(Some(&caller)).await;

        assert!(matches!(
            result,
            Err(UserError::Access(AccessError::Forbidden))
        ));
    }

    #[tokio::test]
    async fn test_list_users_allowed_for_admin() {
        let mut repository = MockTestUserRepository::new();
        repository
            .expect_list_all()
            .times(1)
            .returning(|| Ok(vec![stored_user(Role::User)]));

        let service = UserService::new(Arc::new(repository));

        let caller = identity(Role::Admin);
        let users = service.list_users(Some(&caller)).await.unwrap();
        assert_eq!(users.len(), 1);
    }

    #[tokio::test]
    async fn test_get_user_not_found() {
        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_id()
            .times(1)
            .returning(|_| Ok(None));

        let service = UserService::new(Arc::new(repository));

        let caller = identity(Role::Admin);
        let result = service.get_user(Some(&caller), &UserId::new()).await;
        assert!(matches!(result, Err(UserError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_user_missing_id_is_not_found_before_field_checks() {
        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_id()
            .times(1)
            .returning(|_| Ok(None));
        repository.expect_save().times(0);

        let service = UserService::new(Arc::new(repository));

        let caller = identity(Role::Admin);
        // Empty command: on a missing user the 404 must win over the 400.
        let result = service
            .update_user(
                Some(&caller),
                &UserId::new(),
                AdminUpdateUserCommand {
                    name: None,
                    role: None,
                },
            )
            .await;

        assert!(matches!(result, Err(UserError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_user_changes_role() {
        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_id()
            .times(1)
            .returning(|_| Ok(Some(stored_user(Role::User))));
        repository
            .expect_save()
            .withf(|user| user.role == Role::Admin)
            .times(1)
            .returning(|user| Ok(user));

        let service = UserService::new(Arc::new(repository));

        let caller = identity(Role::Admin);
        let updated = service
            .update_user(
                Some(&caller),
                &UserId::new(),
                AdminUpdateUserCommand {
                    name: None,
                    role: Some(Role::Admin),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.role, Role::Admin);
    }

    #[tokio::test]
    async fn test_delete_user_missing_id_is_not_found() {
        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_id()
            .times(1)
            .returning(|_| Ok(None));
        repository.expect_delete_by_id().times(0);

        let service = UserService::new(Arc::new(repository));

        let caller = identity(Role::Admin);
        let result = service.delete_user(Some(&caller), &UserId::new()).await;
        assert!(matches!(result, Err(UserError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_ensure_admin_creates_once() {
        let mut repository = MockTestUserRepository::new();
        repository
            .expect_exists_by_email()
            .times(1)
            .returning(|_| Ok(false));
        repository
            .expect_save()
            .withf(|user| user.role == Role::Admin && user.name == "SuperAdmin")
            .times(1)
            .returning(|user| Ok(user));

        let service = UserService::new(Arc::new(repository));

        service
            .ensure_admin(&email("root@example.com"), "$argon2id$encoded")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_ensure_admin_is_idempotent() {
        let mut repository = MockTestUserRepository::new();
        repository
            .expect_exists_by_email()
            .times(1)
            .returning(|_| Ok(true));
        repository.expect_save().times(0);

        let service = UserService::new(Arc::new(repository));

        service
            .ensure_admin(&email("root@example.com"), "$argon2id$encoded")
            .await
            .unwrap();
    }
}
