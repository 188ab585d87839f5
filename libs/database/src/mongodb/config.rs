//! MongoDB connection configuration.

use std::time::Duration;

/// Connection settings applied on top of the connection string.
#[derive(Debug, Clone)]
pub struct MongoConfig {
    /// Connection string, e.g. `mongodb://localhost:27017`.
    pub url: String,
    /// Database name.
    pub database: String,
    /// Application name reported to the server, visible in server logs
    /// and `currentOp`.
    pub app_name: Option<String>,
    pub max_pool_size: u32,
    pub min_pool_size: u32,
    pub connect_timeout: Duration,
    pub server_selection_timeout: Duration,
}

impl MongoConfig {
    pub fn new(url: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            database: database.into(),
            ..Self::default()
        }
    }

    pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = Some(app_name.into());
        self
    }

    pub fn with_pool_size(mut self, min: u32, max: u32) -> Self {
        self.min_pool_size = min;
        self.max_pool_size = max;
        self
    }
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self {
            url: "mongodb://localhost:27017".to_string(),
            database: "app".to_string(),
            app_name: None,
            max_pool_size: 100,
            min_pool_size: 5,
            connect_timeout: Duration::from_secs(10),
            server_selection_timeout: Duration::from_secs(30),
        }
    }
}

#[cfg(feature = "config")]
mod from_env {
    use core_config::{env_required, ConfigError, FromEnv};
    use std::env;
    use std::time::Duration;

    use super::MongoConfig;

    fn env_parsed<T: std::str::FromStr>(key: &str) -> Result<Option<T>, ConfigError>
    where
        T::Err: std::fmt::Display,
    {
        match env::var(key) {
            Ok(raw) => raw
                .parse()
                .map(Some)
                .map_err(|err: T::Err| ConfigError::ParseError {
                    key: key.to_string(),
                    details: err.to_string(),
                }),
            Err(_) => Ok(None),
        }
    }

    impl FromEnv for MongoConfig {
        /// Read the connection settings from the environment.
        ///
        /// `MONGODB_URL` and `MONGODB_DATABASE` are required (legacy
        /// `MONGO_URL`/`MONGO_DATABASE` are accepted as fallbacks); pool
        /// sizes, timeouts and the app name are optional overrides.
        fn from_env() -> Result<Self, ConfigError> {
            let url = env_required("MONGODB_URL").or_else(|_| env_required("MONGO_URL"))?;
            let database =
                env_required("MONGODB_DATABASE").or_else(|_| env_required("MONGO_DATABASE"))?;

            let mut config = MongoConfig::new(url, database);
            config.app_name = env::var("MONGODB_APP_NAME").ok();

            if let Some(max) = env_parsed("MONGODB_MAX_POOL_SIZE")? {
                config.max_pool_size = max;
            }
            if let Some(min) = env_parsed("MONGODB_MIN_POOL_SIZE")? {
                config.min_pool_size = min;
            }
            if let Some(secs) = env_parsed::<u64>("MONGODB_CONNECT_TIMEOUT_SECS")? {
                config.connect_timeout = Duration::from_secs(secs);
            }
            if let Some(secs) = env_parsed::<u64>("MONGODB_SERVER_SELECTION_TIMEOUT_SECS")? {
                config.server_selection_timeout = Duration::from_secs(secs);
            }

            Ok(config)
        }
    }
}
