use mongodb::{Client, Database, bson::doc, options::ClientOptions};
use tracing::info;

use super::MongoConfig;
use crate::error::{DatabaseError, DatabaseResult};
use crate::retry::retry_with_backoff;

/// Connect and verify the connection with a `ping`.
pub async fn connect(config: &MongoConfig) -> DatabaseResult<Client> {
    info!(database = %config.database, "Connecting to MongoDB");

    let mut options = ClientOptions::parse(&config.url).await?;
    options.max_pool_size = Some(config.max_pool_size);
    options.min_pool_size = Some(config.min_pool_size);
    options.connect_timeout = Some(config.connect_timeout());
    options.server_selection_timeout = Some(config.server_selection_timeout());
    options.app_name = config.app_name.clone();

    let client = Client::with_options(options)?;
    client
        .database(&config.database)
        .run_command(doc! { "ping": 1 })
        .await
        .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

    info!("Successfully connected to MongoDB");
    Ok(client)
}

/// [`connect`] with exponential backoff, returning the configured database.
///
/// ```ignore
/// use database::mongodb::{MongoConfig, connect_with_retry};
/// use core_config::FromEnv;
///
/// let db = connect_with_retry(&MongoConfig::from_env()?).await?;
/// ```
pub async fn connect_with_retry(config: &MongoConfig) -> DatabaseResult<Database> {
    let client = retry_with_backoff(|| connect(config), &config.retry_config()).await?;
    Ok(client.database(&config.database))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_invalid_url_fails_without_network() {
        let config = MongoConfig::new("not-a-mongodb-url");
        let err = connect(&config).await.unwrap_err();
        assert!(matches!(err, DatabaseError::Mongo(_)));
    }

    #[tokio::test]
    #[ignore] // Requires a running MongoDB
    async fn test_connect_with_retry() {
        let url = std::env::var("MONGODB_URL").unwrap_or_else(|_| "mongodb://localhost:27017".into());
        let db = connect_with_retry(&MongoConfig::new(url)).await.unwrap();
        assert_eq!(db.name(), "catalog");
    }
}
