//! Load config from the environment (and `.env` when present).

use crate::config::{validate, Config};
use crate::error::ConfigError;

pub const ENV_DB_DRIVER: &str = "CRUD_DB_DRIVER";
pub const ENV_DB_NAME: &str = "CRUD_DB_NAME";
pub const ENV_BASE_PATH: &str = "CRUD_BASE_PATH";
pub const ENV_MAX_RECS: &str = "CRUD_MAX_RECS";
pub const ENV_LISTEN_ADDR: &str = "CRUD_LISTEN_ADDR";
pub const ENV_BODY_LIMIT: &str = "CRUD_BODY_LIMIT";

/// Read `.env` if present, then the process environment.
pub fn load_from_env() -> Result<Config, ConfigError> {
    dotenvy::dotenv().ok();
    load_with(|key| std::env::var(key).ok())
}

/// Build a config from an arbitrary key lookup. Empty values fall back to defaults.
pub fn load_with<F>(lookup: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.is_empty());
    let defaults = Config::default();

    let max_recs = match get(ENV_MAX_RECS) {
        Some(v) => v.parse::<i64>().map_err(|e| ConfigError::Invalid {
            key: ENV_MAX_RECS,
            message: format!("{:?}: {}", v, e),
        })?,
        None => defaults.max_recs,
    };
    let body_limit = match get(ENV_BODY_LIMIT) {
        Some(v) => v.parse::<usize>().map_err(|e| ConfigError::Invalid {
            key: ENV_BODY_LIMIT,
            message: format!("{:?}: {}", v, e),
        })?,
        None => defaults.body_limit,
    };

    let config = Config {
        db_driver: get(ENV_DB_DRIVER).unwrap_or(defaults.db_driver),
        db_name: get(ENV_DB_NAME).unwrap_or(defaults.db_name),
        base_path: get(ENV_BASE_PATH).unwrap_or(defaults.base_path),
        max_recs,
        listen_addr: get(ENV_LISTEN_ADDR).unwrap_or(defaults.listen_addr),
        body_limit,
    };
    tracing::debug!(
        db_driver = %config.db_driver,
        db_name = %config.db_name,
        base_path = %config.base_path,
        max_recs = config.max_recs,
        "loaded config"
    );
    validate(&config)?;
    Ok(config)
}
