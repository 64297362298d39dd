//! Table record handlers: list, read, create, update, delete.

use crate::error::AppError;
use crate::response::{ApiResponse, IdsResponse, NumChangedResponse, RecordsResponse, TableNamesResponse};
use crate::routes::{HandlerContext, HandlerResult};
use crate::service::{get_body_record, CrudService};
use serde_json::json;

const LIST_PARAMS: &[&str] = &["table_name", "id_field", "ids", "fields", "limit", "offset"];
const ONE_PARAMS: &[&str] = &["table_name", "id_field", "id", "fields", "limit"];
const MANY_WRITE_PARAMS: &[&str] = &["table_name", "id_field", "ids"];
const ONE_WRITE_PARAMS: &[&str] = &["table_name", "id_field", "id"];
/// Collection routes filter by `ids`, or by `id` when the query names one.
const OPTIONAL_ID: &[&str] = &["id"];

/// Placeholder for routes that are wired but not built.
pub async fn not_implemented(_ctx: HandlerContext) -> HandlerResult {
    Err(AppError::NotImplemented)
}

pub async fn get_db_resources(_ctx: HandlerContext) -> HandlerResult {
    ApiResponse::ok_json(&json!({ "Resources": ["_schema", "_table"] }))
}

pub async fn get_db_tables(ctx: HandlerContext) -> HandlerResult {
    let names = CrudService::table_names(ctx.state.store.as_ref()).await?;
    ApiResponse::ok_json(&TableNamesResponse { names })
}

pub async fn get_db_records(ctx: HandlerContext) -> HandlerResult {
    let params = ctx.fetch_params_with(LIST_PARAMS, OPTIONAL_ID)?;
    let records = CrudService::list(ctx.state.store.as_ref(), &params).await?;
    ApiResponse::ok_json(&RecordsResponse { records })
}

pub async fn get_db_record(ctx: HandlerContext) -> HandlerResult {
    let params = ctx.fetch_params(ONE_PARAMS)?;
    let records = CrudService::read(ctx.state.store.as_ref(), &params).await?;
    ApiResponse::ok_json(&RecordsResponse { records })
}

pub async fn create_db_records(ctx: HandlerContext) -> HandlerResult {
    let table = ctx.state.params.get_param(&ctx.req, "table_name")?;
    let body = get_body_record(&ctx.req.body)?;
    let ids = CrudService::create(ctx.state.store.as_ref(), &table, &body.records).await?;
    ApiResponse::created_json(&IdsResponse { ids })
}

async fn update(ctx: &HandlerContext, names: &[&str], optional: &[&str]) -> HandlerResult {
    let params = ctx.fetch_params_with(names, optional)?;
    let body = get_body_record(&ctx.req.body)?;
    let num_changed = CrudService::update(ctx.state.store.as_ref(), &params, &body.records).await?;
    ApiResponse::ok_json(&NumChangedResponse { num_changed })
}

pub async fn update_db_records(ctx: HandlerContext) -> HandlerResult {
    update(&ctx, MANY_WRITE_PARAMS, OPTIONAL_ID).await
}

pub async fn update_db_record(ctx: HandlerContext) -> HandlerResult {
    update(&ctx, ONE_WRITE_PARAMS, &[]).await
}

async fn delete(ctx: &HandlerContext, names: &[&str], optional: &[&str]) -> HandlerResult {
    let params = ctx.fetch_params_with(names, optional)?;
    let num_changed = CrudService::delete(ctx.state.store.as_ref(), &params).await?;
    ApiResponse::ok_json(&NumChangedResponse { num_changed })
}

pub async fn delete_db_records(ctx: HandlerContext) -> HandlerResult {
    delete(&ctx, MANY_WRITE_PARAMS, OPTIONAL_ID).await
}

pub async fn delete_db_record(ctx: HandlerContext) -> HandlerResult {
    delete(&ctx, ONE_WRITE_PARAMS, &[]).await
}
