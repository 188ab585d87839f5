use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::{CreateUser, User};

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create_user(&self, input: CreateUser) -> UserResult<User>;

    /// Exact match against the stored (lowercase) email.
    async fn find_by_email(&self, email: &str) -> UserResult<Option<User>>;

    async fn find_by_id(&self, id: Uuid) -> UserResult<Option<User>>;
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create_user(&self, input: CreateUser) -> UserResult<User> {
        let user = User::new(input);
        let mut users = self.users.write().await;
        if users.values().any(|existing| existing.email == user.email) {
            return Err(UserError::DuplicateEmail(user.email));
        }
        tracing::info!(user_id = %user.id, "Created user");
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|user| user.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }
}
