use core_config::{
    AppInfo, ConfigError, FromEnv, app_info, env_parse, features::FeatureFlags,
    server::ServerConfig,
};
use database::mongodb::MongoConfig;
use std::str::FromStr;

pub use core_config::Environment;

/// Where the catalogs keep their entities.
#[derive(Clone, Debug, PartialEq)]
pub enum Storage {
    /// Process-local maps, lost on restart
    Memory { seed_sample_data: bool },
    MongoDb(MongoConfig),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum StorageBackend {
    Memory,
    MongoDb,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "mongodb" | "mongo" => Ok(Self::MongoDb),
            other => Err(format!("unknown storage backend '{other}', expected memory or mongodb")),
        }
    }
}

impl FromEnv for Storage {
    /// Reads `STORAGE_BACKEND` (default `memory`); the MongoDB settings are
    /// only required when that backend is selected.
    fn from_env() -> Result<Self, ConfigError> {
        match env_parse("STORAGE_BACKEND", StorageBackend::Memory)? {
            StorageBackend::Memory => Ok(Storage::Memory {
                seed_sample_data: env_parse("SEED_SAMPLE_DATA", true)?,
            }),
            StorageBackend::MongoDb => Ok(Storage::MongoDb(MongoConfig::from_env()?)),
        }
    }
}

/// Application configuration, composed from the shared config components
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub server: ServerConfig,
    pub environment: Environment,
    pub features: FeatureFlags,
    pub storage: Storage,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        Ok(Self {
            app: app_info!(),
            server: ServerConfig::from_env()?,
            environment: Environment::from_env(),
            features: FeatureFlags::from_env()?,
            storage: Storage::from_env()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_is_default() {
        temp_env::with_vars(
            [("STORAGE_BACKEND", None::<&str>), ("SEED_SAMPLE_DATA", None)],
            || {
                let storage = Storage::from_env().unwrap();
                assert_eq!(storage, Storage::Memory { seed_sample_data: true });
            },
        );
    }

    #[test]
    fn test_mongodb_requires_url() {
        temp_env::with_vars(
            [
                ("STORAGE_BACKEND", Some("MongoDB")),
                ("MONGODB_URL", None),
                ("MONGO_URL", None),
            ],
            || {
                let err = Storage::from_env().unwrap_err();
                assert!(matches!(err, ConfigError::MissingEnvVar(_)));
            },
        );
    }

    #[test]
    fn test_mongodb_backend() {
        temp_env::with_vars(
            [
                ("STORAGE_BACKEND", Some("mongodb")),
                ("MONGODB_URL", Some("mongodb://db:27017")),
                ("MONGODB_DATABASE", Some("shop")),
            ],
            || match Storage::from_env().unwrap() {
                Storage::MongoDb(mongo) => assert_eq!(mongo.database, "shop"),
                other => panic!("unexpected storage: {other:?}"),
            },
        );
    }

    #[test]
    fn test_unknown_backend_is_rejected() {
        temp_env::with_var("STORAGE_BACKEND", Some("postgres"), || {
            let err = Storage::from_env().unwrap_err();
            assert!(matches!(err, ConfigError::ParseError { ref key, .. } if key == "STORAGE_BACKEND"));
        });
    }
}
