//! Request-body records and their structural validation.

use crate::error::AppError;
use crate::sql::BindValue;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

/// One row's worth of column assignments, keys and values in parallel.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct KvRecord {
    pub keys: Vec<String>,
    pub values: Vec<Value>,
}

impl KvRecord {
    pub fn new(keys: Vec<String>, values: Vec<Value>) -> Self {
        KvRecord { keys, values }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.keys.iter().position(|k| k == key).and_then(|i| self.values.get(i))
    }
}

/// Write-request body: `{"Records": [{"Keys": [...], "Values": [...]}, ...]}`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct BodyRecord {
    pub records: Vec<KvRecord>,
}

pub fn get_body_record(body: &[u8]) -> Result<BodyRecord, AppError> {
    serde_json::from_slice(body).map_err(|e| AppError::BodyDecode(e.to_string()))
}

/// Keys must be non-empty, not purely numeric, and unique within the record.
pub fn validate_sql_keys(keys: &[String]) -> Result<(), AppError> {
    let mut seen = HashSet::with_capacity(keys.len());
    for k in keys {
        if k.is_empty() {
            return Err(AppError::Validation("empty key".into()));
        }
        if k.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AppError::Validation(format!("numeric key \"{}\"", k)));
        }
        if !seen.insert(k.as_str()) {
            return Err(AppError::Validation(format!("duplicate key \"{}\"", k)));
        }
    }
    Ok(())
}

pub fn validate_sql_values(values: &[Value]) -> Result<(), AppError> {
    for v in values {
        if v.is_array() || v.is_object() {
            return Err(AppError::Validation(format!("value {} is not a scalar", v)));
        }
        if v.is_u64() && !v.is_i64() {
            return Err(AppError::Validation(format!("integer {} out of range", v)));
        }
    }
    Ok(())
}

/// Structural checks on every record; stops at the first bad one. Zero records is valid.
pub fn validate_records(records: &[KvRecord]) -> Result<(), AppError> {
    for (i, rec) in records.iter().enumerate() {
        if rec.keys.len() != rec.values.len() {
            return Err(AppError::Validation(format!(
                "record {}: {} keys but {} values",
                i,
                rec.keys.len(),
                rec.values.len()
            )));
        }
        validate_sql_keys(&rec.keys)
            .and_then(|_| validate_sql_values(&rec.values))
            .map_err(|e| AppError::Validation(format!("record {}: {}", i, e)))?;
    }
    Ok(())
}

/// Values in the form the binding layer takes. Anything that is not a scalar is a
/// `Binding` error: reaching here with one means validation was skipped.
pub fn conv_values(values: &[Value]) -> Result<Vec<BindValue>, AppError> {
    values.iter().map(BindValue::from_json).collect()
}

/// Names from a table-listing query whose rows each carry a `name` column.
pub fn conv_table_names(records: &[KvRecord]) -> Result<Vec<String>, AppError> {
    records
        .iter()
        .map(|rec| match rec.get("name") {
            Some(Value::String(s)) => Ok(s.clone()),
            Some(other) => Err(AppError::Binding(format!("table name {} is not a string", other))),
            None => Err(AppError::Binding("table listing row has no name column".into())),
        })
        .collect()
}
