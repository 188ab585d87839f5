use async_trait::async_trait;
use mongodb::bson::doc;
use mongodb::options::IndexOptions;
use mongodb::{Collection, Database, IndexModel};
use tracing::instrument;
use uuid::Uuid;

use repository::is_duplicate_key_error;

use crate::error::{UserError, UserResult};
use crate::models::{CreateUser, User};
use crate::repository::UserRepository;

const COLLECTION: &str = "users";

#[derive(Debug, Clone)]
pub struct MongoUserRepository {
    collection: Collection<User>,
}

impl MongoUserRepository {
    pub fn new(database: &Database) -> Self {
        Self {
            collection: database.collection(COLLECTION),
        }
    }

    pub fn collection(&self) -> &Collection<User> {
        &self.collection
    }

    /// Enforces email uniqueness at the storage layer. Call once at startup.
    #[instrument(skip(self))]
    pub async fn init_indexes(&self) -> UserResult<()> {
        let index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("idx_email_unique".to_string())
                    .build(),
            )
            .build();
        self.collection.create_index(index).await?;
        tracing::info!(collection = COLLECTION, "Ensured user indexes");
        Ok(())
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    #[instrument(skip(self, input))]
    async fn create_user(&self, input: CreateUser) -> UserResult<User> {
        let user = User::new(input);
        self.collection.insert_one(&user).await.map_err(|err| {
            if is_duplicate_key_error(&err) {
                UserError::DuplicateEmail(user.email.clone())
            } else {
                err.into()
            }
        })?;
        tracing::info!(user_id = %user.id, "Created user");
        Ok(user)
    }

    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> UserResult<Option<User>> {
        let user = self.collection.find_one(doc! { "email": email }).await?;
        Ok(user)
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> UserResult<Option<User>> {
        let user = self
            .collection
            .find_one(doc! { "_id": id.to_string() })
            .await?;
        Ok(user)
    }
}
