//! Error types for the persistence core.

use mongodb::error::{ErrorKind, WriteFailure};
use thiserror::Error;

/// Errors surfaced by repositories and stores.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Duplicate value for unique field: {0}")]
    DuplicateKey(String),

    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

impl RepositoryError {
    /// Classify a driver error, surfacing unique-index violations as
    /// [`RepositoryError::DuplicateKey`]. Write paths that can trip a
    /// unique index map through this instead of the blanket `From`.
    pub fn from_mongo(err: mongodb::error::Error) -> Self {
        match err.kind.as_ref() {
            ErrorKind::Write(WriteFailure::WriteError(write_error))
                if write_error.code == 11000 =>
            {
                RepositoryError::DuplicateKey(write_error.message.clone())
            }
            // findAndModify reports duplicate keys as a command error.
            ErrorKind::Command(command_error) if command_error.code == 11000 => {
                RepositoryError::DuplicateKey(command_error.message.clone())
            }
            _ => RepositoryError::Database(err),
        }
    }
}

/// True for the server's E11000 duplicate-key error.
pub fn is_duplicate_key_error(err: &mongodb::error::Error) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => write_error.code == 11000,
        ErrorKind::Command(command_error) => command_error.code == 11000,
        _ => false,
    }
}

impl From<mongodb::bson::ser::Error> for RepositoryError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        RepositoryError::Serialization(err.to_string())
    }
}

impl From<mongodb::bson::de::Error> for RepositoryError {
    fn from(err: mongodb::bson::de::Error) -> Self {
        RepositoryError::Serialization(err.to_string())
    }
}
