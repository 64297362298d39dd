//! Health and version handlers.

use crate::response::ApiResponse;
use crate::routes::{HandlerContext, HandlerResult};
use axum::http::StatusCode;
use serde_json::json;

pub async fn health(_ctx: HandlerContext) -> HandlerResult {
    Ok(ApiResponse::text(StatusCode::OK, "ok"))
}

pub async fn version(_ctx: HandlerContext) -> HandlerResult {
    ApiResponse::ok_json(&json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION")
    }))
}
