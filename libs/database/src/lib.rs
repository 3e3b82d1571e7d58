//! Connection management for the catalog's document store.
//!
//! ```ignore
//! use core_config::FromEnv;
//! use database::mongodb::{self, MongoConfig};
//!
//! let config = MongoConfig::from_env()?;
//! let db = mongodb::connect_with_retry(&config).await?;
//! mongodb::check_health(&db).await?;
//! ```

pub mod error;
pub mod mongodb;
pub mod retry;

pub use error::{DatabaseError, DatabaseResult};
pub use retry::{RetryConfig, retry_with_backoff};
