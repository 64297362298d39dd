//! Config validation.

use crate::config::Config;
use crate::error::ConfigError;

const SUPPORTED_DRIVERS: &[&str] = &["sqlite"];

pub fn validate(config: &Config) -> Result<(), ConfigError> {
    if !SUPPORTED_DRIVERS.contains(&config.db_driver.as_str()) {
        return Err(ConfigError::UnsupportedDriver(config.db_driver.clone()));
    }
    if config.db_name.is_empty() {
        return Err(ConfigError::Invalid {
            key: "db_name",
            message: "must not be empty".into(),
        });
    }
    let bp = &config.base_path;
    if !bp.starts_with('/') || (bp.len() > 1 && bp.ends_with('/')) {
        return Err(ConfigError::Invalid {
            key: "base_path",
            message: format!("{:?} must start with '/' and have no trailing '/'", bp),
        });
    }
    if config.max_recs <= 0 {
        return Err(ConfigError::Invalid {
            key: "max_recs",
            message: format!("{} must be positive", config.max_recs),
        });
    }
    if config.body_limit == 0 {
        return Err(ConfigError::Invalid {
            key: "body_limit",
            message: "must be positive".into(),
        });
    }
    Ok(())
}
