//! MongoDB health probe.

use mongodb::Client;
use tracing::debug;

/// True when the deployment answers a `listDatabases` round trip.
pub async fn check_health(client: &Client) -> bool {
    match client.list_database_names().await {
        Ok(_) => true,
        Err(err) => {
            debug!(error = %err, "MongoDB health check failed");
            false
        }
    }
}
