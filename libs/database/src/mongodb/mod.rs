//! MongoDB connection management: configuration, connector, and health
//! probe.

pub mod config;
pub mod connector;
pub mod health;

pub use config::MongoConfig;
pub use connector::{connect, connect_with_retry, MongoError};
pub use health::check_health;
