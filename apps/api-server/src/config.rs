//! Application configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use photogram_infra::JwtConfig;
use photogram_infra::database::DatabaseConfig;
use photogram_infra::storage::PhotoStorageConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseConfig>,
    pub photos: PhotoStorageConfig,
    pub jwt: JwtConfig,
}

fn parsed_var<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.parse().ok())
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = env::var("DATABASE_URL").ok().map(|url| {
            let mut config = DatabaseConfig::new(url);
            if let Some(max) = parsed_var("DB_MAX_CONNECTIONS") {
                config.max_connections = max;
            }
            if let Some(min) = parsed_var("DB_MIN_CONNECTIONS") {
                config.min_connections = min;
            }
            config
        });

        let defaults = PhotoStorageConfig::default();
        let photos = PhotoStorageConfig {
            save_dir: env::var("PHOTO_SAVE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.save_dir),
            public_url: env::var("PHOTO_URL").unwrap_or(defaults.public_url),
            max_bytes: parsed_var("PHOTO_MAX_BYTES").unwrap_or(defaults.max_bytes),
        };

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parsed_var("PORT").unwrap_or(8080),
            database,
            photos,
            jwt: JwtConfig::from_env(),
        }
    }
}
