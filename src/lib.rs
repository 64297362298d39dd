//! SQL CRUD: a generic REST facade over relational tables.

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod response;
pub mod routes;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::{load_from_env, validate, Config};
pub use error::{AppError, ConfigError, ErrorResponse};
pub use response::{ApiResponse, Payload};
pub use routes::{api_table, build_router, ApiDesc, RoutingTable};
pub use service::CrudService;
pub use state::AppState;
pub use store::{RowStore, SqliteStore};
