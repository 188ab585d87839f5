//! Error types for the catalog domain.

use repository::RepositoryError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Product not found: {0}")]
    NotFound(String),

    #[error("Duplicate value for unique field: {0}")]
    Duplicate(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

impl From<RepositoryError> for CatalogError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Validation(message) => CatalogError::Validation(message),
            RepositoryError::DuplicateKey(message) => CatalogError::Duplicate(message),
            RepositoryError::Database(err) => CatalogError::Database(err.to_string()),
            RepositoryError::Serialization(message) => CatalogError::Database(message),
        }
    }
}
