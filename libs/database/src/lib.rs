//! Database connection utilities.
//!
//! Wraps MongoDB client construction behind [`mongodb::MongoConfig`],
//! with retrying connects for startup races and a health probe for
//! readiness checks.
//!
//! # Usage
//!
//! ```rust,no_run
//! use database::mongodb::{connect_with_retry, MongoConfig};
//!
//! # async fn example() -> Result<(), database::mongodb::MongoError> {
//! let config = MongoConfig::new("mongodb://localhost:27017", "catalog");
//! let client = connect_with_retry(&config, None).await?;
//! let db = client.database(&config.database);
//! # Ok(())
//! # }
//! ```
//!
//! With the `config` feature enabled, `MongoConfig` also implements
//! `core_config::FromEnv` and reads `MONGODB_URL`/`MONGODB_DATABASE`.

pub mod common;
pub mod mongodb;

pub use common::{retry, retry_with_backoff, RetryConfig};
