//! Builds `?`-parameterized SELECT, INSERT, UPDATE, DELETE from validated parameters.
//!
//! Table, field and id-column names are inlined, so each is re-checked as a plain
//! identifier here; every other user value is either bound through a placeholder
//! or is an integer that already parsed as an `IdValue`.

use crate::error::AppError;
use crate::extractors::ParamMap;
use crate::service::conv_values;
use crate::service::validation::is_valid_ident;
use crate::sql::{BindValue, IdValue};
use serde_json::Value;

const DEFAULT_ID_FIELD: &str = "id";

/// A WHERE fragment over the id column plus the ids bound to its placeholders.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IdClause {
    pub where_text: String,
    pub ids: Vec<IdValue>,
}

impl IdClause {
    pub fn is_empty(&self) -> bool {
        self.where_text.is_empty()
    }
}

/// A SELECT statement; one id per `?` in `sql`, in order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectStatement {
    pub sql: String,
    pub ids: Vec<IdValue>,
}

impl SelectStatement {
    pub fn bind_values(&self) -> Vec<BindValue> {
        self.ids.iter().copied().map(BindValue::from).collect()
    }
}

pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<BindValue>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: BindValue) -> &'static str {
        self.params.push(v);
        "?"
    }
}

/// Which rows an id-filtered statement touches.
enum IdSelection {
    All,
    One(IdValue),
    Many(Vec<IdValue>),
}

/// `s` repeated `n` times, comma separated. `nstring("?", 3) == "?,?,?"`.
pub fn nstring(s: &str, n: usize) -> String {
    vec![s; n].join(",")
}

fn non_empty<'a>(params: &'a ParamMap, name: &str) -> Option<&'a str> {
    params.get(name).map(String::as_str).filter(|v| !v.is_empty())
}

fn ident<'a>(name: &str, value: &'a str) -> Result<&'a str, AppError> {
    if is_valid_ident(value) {
        Ok(value)
    } else {
        Err(AppError::Validation(format!("invalid {} \"{}\"", name, value)))
    }
}

fn parse_id(name: &str, s: &str) -> Result<IdValue, AppError> {
    s.parse()
        .map_err(|_| AppError::Validation(format!("invalid {} \"{}\"", name, s)))
}

fn table_name(params: &ParamMap) -> Result<&str, AppError> {
    let table = non_empty(params, "table_name")
        .ok_or_else(|| AppError::Validation("table_name is required".into()))?;
    ident("table_name", table)
}

/// Shared parsing for both clause variants: the id column and the selected ids.
fn id_selection(params: &ParamMap) -> Result<(&str, IdSelection), AppError> {
    let id_field = ident("id_field", non_empty(params, "id_field").unwrap_or(DEFAULT_ID_FIELD))?;
    let selection = match (non_empty(params, "id"), non_empty(params, "ids")) {
        (Some(_), Some(_)) => {
            return Err(AppError::Validation(
                "id and ids cannot be used together".into(),
            ))
        }
        (Some(id), None) => IdSelection::One(parse_id("id", id)?),
        (None, Some(ids)) => IdSelection::Many(
            ids.split(',')
                .map(|s| parse_id("ids", s))
                .collect::<Result<Vec<_>, _>>()?,
        ),
        (None, None) => IdSelection::All,
    };
    Ok((id_field, selection))
}

/// Placeholder variant: `WHERE id = ?` or `WHERE id in (?,?)` with the ids in
/// parameter order. No id filter yields an empty clause.
pub fn mk_id_clause(params: &ParamMap) -> Result<IdClause, AppError> {
    let (id_field, selection) = id_selection(params)?;
    Ok(match selection {
        IdSelection::All => IdClause::default(),
        IdSelection::One(id) => IdClause {
            where_text: format!("WHERE {} = ?", id_field),
            ids: vec![id],
        },
        IdSelection::Many(ids) => IdClause {
            where_text: format!("WHERE {} in ({})", id_field, nstring("?", ids.len())),
            ids,
        },
    })
}

/// Literal variant for statements whose placeholders are taken by other values:
/// `WHERE id in (123,456)`. Only parsed integers are interpolated.
pub fn mk_id_clause_update(params: &ParamMap) -> Result<String, AppError> {
    let (id_field, selection) = id_selection(params)?;
    Ok(match selection {
        IdSelection::All => String::new(),
        IdSelection::One(id) => format!("WHERE {} = {}", id_field, id),
        IdSelection::Many(ids) => format!(
            "WHERE {} in ({})",
            id_field,
            crate::sql::id_list_to_string(&ids)
        ),
    })
}

/// `SELECT <fields> FROM <table> [<id clause> ]LIMIT <n> OFFSET <m>`.
/// Limit and offset are inlined as integers; only the id clause binds values.
pub fn mk_select_string(params: &ParamMap) -> Result<SelectStatement, AppError> {
    let table = table_name(params)?;
    let fields = match non_empty(params, "fields") {
        None | Some("*") => "*",
        Some(f) => {
            for name in f.split(',') {
                ident("fields", name)?;
            }
            f
        }
    };
    let limit: i64 = non_empty(params, "limit")
        .ok_or_else(|| AppError::Validation("limit is required".into()))?
        .parse()
        .map_err(|_| AppError::Validation("invalid limit".into()))?;
    let offset: i64 = non_empty(params, "offset")
        .unwrap_or("0")
        .parse()
        .map_err(|_| AppError::Validation("invalid offset".into()))?;

    let clause = mk_id_clause(params)?;
    let sql = if clause.is_empty() {
        format!("SELECT {} FROM {} LIMIT {} OFFSET {}", fields, table, limit, offset)
    } else {
        format!(
            "SELECT {} FROM {} {} LIMIT {} OFFSET {}",
            fields, table, clause.where_text, limit, offset
        )
    };
    Ok(SelectStatement { sql, ids: clause.ids })
}

/// `INSERT INTO <table> (<k1>,<k2>) VALUES (?,?)`; a record with no keys inserts defaults.
pub fn mk_insert_string(table: &str, keys: &[String], values: &[Value]) -> Result<QueryBuf, AppError> {
    let table = ident("table_name", table)?;
    if keys.len() != values.len() {
        return Err(AppError::Validation(format!(
            "{} keys but {} values",
            keys.len(),
            values.len()
        )));
    }
    let mut q = QueryBuf::new();
    if keys.is_empty() {
        q.sql = format!("INSERT INTO {} DEFAULT VALUES", table);
        return Ok(q);
    }
    let mut cols = Vec::with_capacity(keys.len());
    let mut placeholders = Vec::with_capacity(keys.len());
    for (k, v) in keys.iter().zip(conv_values(values)?) {
        cols.push(ident("key", k)?);
        placeholders.push(q.push_param(v));
    }
    q.sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        table,
        cols.join(","),
        placeholders.join(",")
    );
    Ok(q)
}

/// `UPDATE <table> SET <k1> = ?,<k2> = ? WHERE <id clause>`. SET values take the
/// placeholders, so the id clause is the literal variant. An id filter is required.
pub fn mk_update_string(params: &ParamMap, keys: &[String], values: &[Value]) -> Result<QueryBuf, AppError> {
    let table = table_name(params)?;
    if keys.is_empty() {
        return Err(AppError::Validation("no fields to update".into()));
    }
    if keys.len() != values.len() {
        return Err(AppError::Validation(format!(
            "{} keys but {} values",
            keys.len(),
            values.len()
        )));
    }
    let where_text = mk_id_clause_update(params)?;
    if where_text.is_empty() {
        return Err(AppError::Validation("update requires id or ids".into()));
    }
    let mut q = QueryBuf::new();
    let mut sets = Vec::with_capacity(keys.len());
    for (k, v) in keys.iter().zip(conv_values(values)?) {
        let ph = q.push_param(v);
        sets.push(format!("{} = {}", ident("key", k)?, ph));
    }
    q.sql = format!("UPDATE {} SET {} {}", table, sets.join(","), where_text);
    Ok(q)
}

/// `DELETE FROM <table> WHERE <id clause>`. An id filter is required.
pub fn mk_delete_string(params: &ParamMap) -> Result<String, AppError> {
    let table = table_name(params)?;
    let where_text = mk_id_clause_update(params)?;
    if where_text.is_empty() {
        return Err(AppError::Validation("delete requires id or ids".into()));
    }
    Ok(format!("DELETE FROM {} {}", table, where_text))
}
