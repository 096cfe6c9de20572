use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::{Role, User};

/// Repository trait for User persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a new user
    async fn create(&self, user: User) -> UserResult<User>;

    /// Get a user by ID
    async fn get_by_id(&self, id: Uuid) -> UserResult<Option<User>>;

    /// Get a user by email (case-insensitive)
    async fn get_by_email(&self, email: &str) -> UserResult<Option<User>>;

    /// Get a user holding the given password-reset token
    async fn get_by_reset_token(&self, token: &str) -> UserResult<Option<User>>;

    /// Find the admin account, if one exists
    async fn find_admin(&self) -> UserResult<Option<User>>;

    /// List users, newest first, with the total count
    async fn list(&self, page: u64, limit: u64) -> UserResult<(Vec<User>, u64)>;

    /// Persist a modified user
    async fn update(&self, user: User) -> UserResult<User>;

    /// Delete a user by ID
    async fn delete(&self, id: Uuid) -> UserResult<bool>;
}

/// In-memory implementation of UserRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> UserResult<User> {
        let mut users = self.users.write().await;

        let email_exists = users
            .values()
            .any(|u| u.email.eq_ignore_ascii_case(&user.email));
        if email_exists {
            return Err(UserError::DuplicateEmail(user.email));
        }

        users.insert(user.id, user.clone());

        tracing::info!(user_id = %user.id, "Created user");
        Ok(user)
    }

    async fn get_by_id(&self, id: Uuid) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn get_by_email(&self, email: &str) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn get_by_reset_token(&self, token: &str) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|u| u.reset_token.as_deref() == Some(token))
            .cloned())
    }

    async fn find_admin(&self) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.role == Role::Admin).cloned())
    }

    async fn list(&self, page: u64, limit: u64) -> UserResult<(Vec<User>, u64)> {
        let users = self.users.read().await;
        let total = users.len() as u64;

        let mut result: Vec<User> = users.values().cloned().collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let skip = page.saturating_sub(1).saturating_mul(limit) as usize;
        let result = result
            .into_iter()
            .skip(skip)
            .take(limit as usize)
            .collect();

        Ok((result, total))
    }

    async fn update(&self, user: User) -> UserResult<User> {
        let mut users = self.users.write().await;

        if !users.contains_key(&user.id) {
            return Err(UserError::NotFound(user.id));
        }

        let email_taken = users
            .values()
            .any(|u| u.id != user.id && u.email.eq_ignore_ascii_case(&user.email));
        if email_taken {
            return Err(UserError::DuplicateEmail(user.email));
        }

        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> UserResult<bool> {
        let mut users = self.users.write().await;
        Ok(users.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(email: &str, role: Role) -> User {
        User::new("tester".to_string(), email.to_string(), "hash".to_string(), role)
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let repo = InMemoryUserRepository::new();
        let created = repo.create(user("a@example.com", Role::Customer)).await.unwrap();

        let fetched = repo.get_by_id(created.id).await.unwrap();
        assert_eq!(fetched.unwrap().email, "a@example.com");

        let by_email = repo.get_by_email("A@EXAMPLE.COM").await.unwrap();
        assert!(by_email.is_some());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let repo = InMemoryUserRepository::new();
        repo.create(user("a@example.com", Role::Customer)).await.unwrap();

        let result = repo.create(user("A@example.com", Role::Customer)).await;
        assert!(matches!(result, Err(UserError::DuplicateEmail(_))));
    }

    #[tokio::test]
    async fn test_find_admin() {
        let repo = InMemoryUserRepository::new();
        assert!(repo.find_admin().await.unwrap().is_none());

        repo.create(user("admin@example.com", Role::Admin)).await.unwrap();
        let admin = repo.find_admin().await.unwrap();
        assert_eq!(admin.unwrap().role, Role::Admin);
    }

    #[tokio::test]
    async fn test_get_by_reset_token() {
        let repo = InMemoryUserRepository::new();
        let mut u = user("a@example.com", Role::Customer);
        u.reset_token = Some("tok123".to_string());
        repo.create(u).await.unwrap();

        assert!(repo.get_by_reset_token("tok123").await.unwrap().is_some());
        assert!(repo.get_by_reset_token("other").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_paginates() {
        let repo = InMemoryUserRepository::new();
        for i in 0..5 {
            repo.create(user(&format!("u{}@example.com", i), Role::Customer))
                .await
                .unwrap();
        }

        let (page1, total) = repo.list(1, 2).await.unwrap();
        assert_eq!(total, 5);
        assert_eq!(page1.len(), 2);

        let (page3, _) = repo.list(3, 2).await.unwrap();
        assert_eq!(page3.len(), 1);
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = InMemoryUserRepository::new();
        let created = repo.create(user("a@example.com", Role::Customer)).await.unwrap();

        assert!(repo.delete(created.id).await.unwrap());
        assert!(!repo.delete(created.id).await.unwrap());
    }
}
