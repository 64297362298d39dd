//! Statement execution. The core only sees the `RowStore` trait; `SqliteStore`
//! is the sqlx-backed implementation wired by the host.

use crate::config::Config;
use crate::error::AppError;
use crate::service::KvRecord;
use crate::sql::BindValue;
use async_trait::async_trait;
use serde_json::Value;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{Column, Row, TypeInfo, ValueRef};

/// Result of a statement that does not return rows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExecOutcome {
    pub rows_affected: u64,
    pub last_insert_id: i64,
}

#[async_trait]
pub trait RowStore: Send + Sync {
    /// Run a row-returning statement; each row becomes a record keyed by column name.
    async fn query(&self, sql: &str, params: &[BindValue]) -> Result<Vec<KvRecord>, AppError>;

    async fn execute(&self, sql: &str, params: &[BindValue]) -> Result<ExecOutcome, AppError>;

    /// Statement listing user tables as rows with a `name` column.
    fn table_names_query(&self) -> &str;
}

#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        SqliteStore { pool }
    }

    pub async fn connect(config: &Config) -> Result<Self, AppError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&config.database_url())
            .await?;
        tracing::info!(db = %config.db_name, "connected to database");
        Ok(SqliteStore { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn bind_all<'q>(
    mut q: sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>>,
    params: &[BindValue],
) -> sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>> {
    for p in params {
        q = q.bind(p.clone());
    }
    q
}

/// Decode one column by its storage class.
fn column_value(row: &SqliteRow, i: usize) -> Result<Value, sqlx::Error> {
    let (is_null, type_name) = {
        let raw = row.try_get_raw(i)?;
        (raw.is_null(), raw.type_info().name().to_string())
    };
    if is_null {
        return Ok(Value::Null);
    }
    Ok(match type_name.as_str() {
        "INTEGER" | "BOOLEAN" => Value::from(row.try_get::<i64, _>(i)?),
        "REAL" => Value::from(row.try_get::<f64, _>(i)?),
        "BLOB" => Value::String(String::from_utf8_lossy(&row.try_get::<Vec<u8>, _>(i)?).into_owned()),
        _ => Value::String(row.try_get::<String, _>(i)?),
    })
}

fn row_to_record(row: &SqliteRow) -> Result<KvRecord, sqlx::Error> {
    let mut keys = Vec::with_capacity(row.columns().len());
    let mut values = Vec::with_capacity(row.columns().len());
    for (i, col) in row.columns().iter().enumerate() {
        keys.push(col.name().to_string());
        values.push(column_value(row, i)?);
    }
    Ok(KvRecord::new(keys, values))
}

#[async_trait]
impl RowStore for SqliteStore {
    async fn query(&self, sql: &str, params: &[BindValue]) -> Result<Vec<KvRecord>, AppError> {
        tracing::debug!(sql, nparams = params.len(), "query");
        let rows = bind_all(sqlx::query(sql), params).fetch_all(&self.pool).await?;
        let records = rows.iter().map(row_to_record).collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    async fn execute(&self, sql: &str, params: &[BindValue]) -> Result<ExecOutcome, AppError> {
        tracing::debug!(sql, nparams = params.len(), "execute");
        let res = bind_all(sqlx::query(sql), params).execute(&self.pool).await?;
        Ok(ExecOutcome {
            rows_affected: res.rows_affected(),
            last_insert_id: res.last_insert_rowid(),
        })
    }

    fn table_names_query(&self) -> &str {
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name"
    }
}
