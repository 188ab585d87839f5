use std::sync::Arc;

use tracing::instrument;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::{CreateUser, User};
use crate::repository::UserRepository;

pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> Clone for UserService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Registers an account. The password hash is computed upstream; this
    /// layer only normalizes the email before storing it.
    #[instrument(skip(self, input))]
    pub async fn register_user(&self, mut input: CreateUser) -> UserResult<User> {
        input.email = input.email.trim().to_lowercase();
        self.repository.create_user(input).await
    }

    #[instrument(skip(self))]
    pub async fn get_user(&self, id: Uuid) -> UserResult<User> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id))
    }

    #[instrument(skip(self))]
    pub async fn get_user_by_email(&self, email: &str) -> UserResult<User> {
        let normalized = email.trim().to_lowercase();
        self.repository
            .find_by_email(&normalized)
            .await?
            .ok_or(UserError::EmailNotFound(normalized))
    }
}
