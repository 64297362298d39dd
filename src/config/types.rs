//! Process-wide configuration, built once at startup and shared read-only.

use serde::{Deserialize, Serialize};

pub const DEFAULT_DB_DRIVER: &str = "sqlite";
pub const DEFAULT_DB_NAME: &str = "crud.db";
pub const DEFAULT_BASE_PATH: &str = "/apid";
pub const DEFAULT_MAX_RECS: i64 = 1000;
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Database driver name. Only `sqlite` is wired.
    pub db_driver: String,
    pub db_name: String,
    /// Prefix for every route in the API table, e.g. `/apid`.
    pub base_path: String,
    /// Row-limit ceiling: `limit` values clamp to this.
    pub max_recs: i64,
    pub listen_addr: String,
    /// Maximum accepted request body size in bytes.
    pub body_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            db_driver: DEFAULT_DB_DRIVER.into(),
            db_name: DEFAULT_DB_NAME.into(),
            base_path: DEFAULT_BASE_PATH.into(),
            max_recs: DEFAULT_MAX_RECS,
            listen_addr: DEFAULT_LISTEN_ADDR.into(),
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }
}

impl Config {
    /// Connection URL for the configured driver.
    pub fn database_url(&self) -> String {
        format!("{}://{}?mode=rwc", self.db_driver, self.db_name)
    }
}
