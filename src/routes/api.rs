//! Static API table: every path (relative to the base path) and verb the service answers.

use crate::handlers::{
    create_db_records, delete_db_record, delete_db_records, get_db_record, get_db_records,
    get_db_resources, get_db_tables, health, not_implemented, update_db_record, update_db_records,
    version,
};
use crate::routes::wiring::{ApiDesc, RoutingTable};
use crate::state::AppState;
use axum::http::Method;
use axum::Router;

pub fn api_table() -> Vec<ApiDesc> {
    vec![
        ApiDesc::new("/health", Method::GET, health),
        ApiDesc::new("/version", Method::GET, version),
        ApiDesc::new("/db", Method::GET, get_db_resources),
        ApiDesc::new("/db/_table", Method::GET, get_db_tables),
        ApiDesc::new("/db/_table/:table_name", Method::GET, get_db_records),
        ApiDesc::new("/db/_table/:table_name", Method::POST, create_db_records),
        ApiDesc::new("/db/_table/:table_name", Method::PATCH, update_db_records),
        ApiDesc::new("/db/_table/:table_name", Method::DELETE, delete_db_records),
        ApiDesc::new("/db/_table/:table_name/:id", Method::GET, get_db_record),
        ApiDesc::new("/db/_table/:table_name/:id", Method::PATCH, update_db_record),
        ApiDesc::new("/db/_table/:table_name/:id", Method::DELETE, delete_db_record),
        ApiDesc::new("/db/_schema", Method::GET, not_implemented),
        ApiDesc::new("/db/_schema/:table_name", Method::GET, not_implemented),
        ApiDesc::new("/db/_schema/:table_name", Method::POST, not_implemented),
        ApiDesc::new("/db/_schema/:table_name", Method::PATCH, not_implemented),
        ApiDesc::new("/db/_schema/:table_name", Method::DELETE, not_implemented),
    ]
}

/// Router for the full API under `config.base_path`.
pub fn build_router(state: AppState) -> Router {
    let table = RoutingTable::new(&state.config.base_path, api_table());
    tracing::info!(
        base_path = %state.config.base_path,
        paths = table.maps().len(),
        "registered API routes"
    );
    table.into_router(state)
}
