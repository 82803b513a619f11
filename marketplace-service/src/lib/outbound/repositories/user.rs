use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::user::errors::UserError;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;

/// In-memory user store.
///
/// Stands in for the external data store behind the `UserRepository` port.
/// Enforces the unique email index the same way a backing database would:
/// `save` fails with a conflict when another id holds the email.
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<UserId, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn save(&self, user: User) -> Result<User, UserError> {
        let mut users = self.users.write().await;

        let email_taken = users
            .values()
            .any(|existing| existing.id != user.id && existing.email == user.email);
        if email_taken {
            return Err(UserError::EmailAlreadyExists);
        }

        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|user| user.email == *email)
            .cloned())
    }

    async fn exists_by_email(&self, email: &EmailAddress) -> Result<bool, UserError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .any(|user| user.email == *email))
    }

    async fn list_all(&self) -> Result<Vec<User>, UserError> {
        let mut users: Vec<User> = self.users.read().await.values().cloned().collect();
        users.sort_by_key(|user| user.created_at);
        Ok(users)
    }

    async fn delete_by_id(&self, id: &UserId) -> Result<(), UserError> {
        self.users
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| UserError::NotFound("User not found.".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use auth::Role;
    use chrono::Utc;

    use super::*;

    fn user(email: &str) -> User {
        User {
            id: UserId::new(),
            name: "Someone".to_string(),
            email: EmailAddress::new(email.to_string()).unwrap(),
            password_hash: "$argon2id$test_hash".to_string(),
            role: Role::User,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_save_and_find() {
        let repo = InMemoryUserRepository::new();
        let saved = repo.save(user("a@x.com")).await.unwrap();

        let by_id = repo.find_by_id(&saved.id).await.unwrap().unwrap();
        assert_eq!(by_id.email.as_str(), "a@x.com");

        let by_email = repo
            .find_by_email(&EmailAddress::new("a@x.com".to_string()).unwrap())
            .await
            .unwrap();
        assert!(by_email.is_some());
    }

    #[tokio::test]
    async fn test_save_rejects_duplicate_email() {
        let repo = InMemoryUserRepository::new();
        repo.save(user("a@x.com")).await.unwrap();

        let result = repo.save(user("a@x.com")).await;
        assert!(matches!(result, Err(UserError::EmailAlreadyExists)));
    }

    #[tokio::test]
    async fn test_save_replaces_own_row_without_conflict() {
        let repo = InMemoryUserRepository::new();
        let mut saved = repo.save(user("a@x.com")).await.unwrap();

        saved.name = "Renamed".to_string();
        let updated = repo.save(saved).await.unwrap();
        assert_eq!(updated.name, "Renamed");

        let all = repo.list_all().await.unwrap();
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_missing_user_is_not_found() {
        let repo = InMemoryUserRepository::new();
        let result = repo.delete_by_id(&UserId::new()).await;
        assert!(matches!(result, Err(UserError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_exists_by_email() {
        let repo = InMemoryUserRepository::new();
        repo.save(user("a@x.com")).await.unwrap();

        let present = EmailAddress::new("a@x.com".to_string()).unwrap();
        let absent = EmailAddress::new("b@x.com".to_string()).unwrap();
        assert!(repo.exists_by_email(&present).await.unwrap());
        assert!(!repo.exists_by_email(&absent).await.unwrap());
    }
}
