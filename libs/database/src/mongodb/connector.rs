//! MongoDB client construction.

use mongodb::options::ClientOptions;
use mongodb::Client;
use thiserror::Error;
use tracing::{info, instrument};

use crate::common::{retry_with_backoff, RetryConfig};
use crate::mongodb::MongoConfig;

#[derive(Debug, Error)]
pub enum MongoError {
    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("Failed to connect to MongoDB: {0}")]
    ConnectionFailed(String),
}

/// Build a client from `config` and verify the deployment is reachable.
///
/// The connection string is parsed first, then the pool and timeout
/// settings from `config` are applied on top. Reachability is verified
/// with a `listDatabases` round trip so a bad address fails here rather
/// than on the first query.
#[instrument(skip(config), fields(database = %config.database))]
pub async fn connect(config: &MongoConfig) -> Result<Client, MongoError> {
    let mut options = ClientOptions::parse(&config.url).await?;
    options.app_name = config.app_name.clone();
    options.max_pool_size = Some(config.max_pool_size);
    options.min_pool_size = Some(config.min_pool_size);
    options.connect_timeout = Some(config.connect_timeout);
    options.server_selection_timeout = Some(config.server_selection_timeout);

    let client = Client::with_options(options)?;

    client
        .list_database_names()
        .await
        .map_err(|err| MongoError::ConnectionFailed(err.to_string()))?;

    info!("Connected to MongoDB");
    Ok(client)
}

/// [`connect`] wrapped in exponential backoff, for startup while the
/// database container is still coming up. `None` uses the default policy.
pub async fn connect_with_retry(
    config: &MongoConfig,
    retry: Option<RetryConfig>,
) -> Result<Client, MongoError> {
    let policy = retry.unwrap_or_default();
    retry_with_backoff(|| connect(config), policy).await
}
