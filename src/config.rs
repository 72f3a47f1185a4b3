//! Application configuration management.
//!
//! This module handles loading configuration from environment variables.
//! It uses the `envy` crate to automatically deserialize environment variables into a type-safe struct.

use serde::Deserialize;

/// Which `AccountsRepository` implementation backs the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Postgres,
    Memory,
}

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `STORAGE` (optional): `postgres` or `memory`, defaults to `postgres`
/// - `DATABASE_URL` (required for `postgres`): PostgreSQL connection string
/// - `DATABASE_MAX_CONNECTIONS` (optional): pool size, defaults to 5
/// - `SERVER_PORT` (optional): HTTP server port, defaults to 3000
/// - `WIPE_AND_SEED` (optional): drop, recreate and seed the tables on startup, defaults to true
/// - `LISTING_FAILURE_RATE` (optional): probability that `GET /accounts` fails, defaults to 0.2
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_storage")]
    pub storage: StorageBackend,

    #[serde(default)]
    pub database_url: Option<String>,

    #[serde(default = "default_max_connections")]
    pub database_max_connections: u32,

    #[serde(default = "default_port")]
    pub server_port: u16,

    #[serde(default = "default_wipe_and_seed")]
    pub wipe_and_seed: bool,

    #[serde(default = "default_listing_failure_rate")]
    pub listing_failure_rate: f64,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    Env(#[from] envy::Error),

    #[error("LISTING_FAILURE_RATE must be between 0.0 and 1.0, got {0}")]
    InvalidFailureRate(f64),

    #[error("DATABASE_URL is required when STORAGE=postgres")]
    MissingDatabaseUrl,
}

fn default_storage() -> StorageBackend {
    StorageBackend::Postgres
}

fn default_max_connections() -> u32 {
    5
}

/// Default port if SERVER_PORT environment variable is not set.
fn default_port() -> u16 {
    3000
}

fn default_wipe_and_seed() -> bool {
    true
}

fn default_listing_failure_rate() -> f64 {
    0.2
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// This method first attempts to load a `.env` file (which is optional),
    /// then reads environment variables and deserializes them into a Config struct.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Environment variable values cannot be parsed into expected types
    /// - `DATABASE_URL` is missing for the postgres backend
    /// - `LISTING_FAILURE_RATE` is outside `0.0..=1.0`
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = envy::from_env::<Config>()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.listing_failure_rate) {
            return Err(ConfigError::InvalidFailureRate(self.listing_failure_rate));
        }
        if self.storage == StorageBackend::Postgres && self.database_url.is_none() {
            return Err(ConfigError::MissingDatabaseUrl);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_pairs(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string()));
        let config = envy::from_iter::<_, Config>(vars)?;
        config.validate()?;
        Ok(config)
    }

    #[test]
    fn defaults_apply_when_only_database_url_is_set() {
        let config = from_pairs(&[("DATABASE_URL", "postgres://localhost/bank")]).unwrap();

        assert_eq!(config.storage, StorageBackend::Postgres);
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.database_max_connections, 5);
        assert!(config.wipe_and_seed);
        assert_eq!(config.listing_failure_rate, 0.2);
    }

    #[test]
    fn memory_backend_needs_no_database_url() {
        let config = from_pairs(&[("STORAGE", "memory"), ("LISTING_FAILURE_RATE", "0")]).unwrap();

        assert_eq!(config.storage, StorageBackend::Memory);
        assert_eq!(config.listing_failure_rate, 0.0);
    }

    #[test]
    fn postgres_backend_requires_database_url() {
        let err = from_pairs(&[]).unwrap_err();

        assert!(matches!(err, ConfigError::MissingDatabaseUrl));
    }

    #[test]
    fn failure_rate_out_of_range_is_rejected() {
        let err = from_pairs(&[("STORAGE", "memory"), ("LISTING_FAILURE_RATE", "1.5")])
            .unwrap_err();

        assert!(matches!(err, ConfigError::InvalidFailureRate(rate) if rate == 1.5));
    }
}
