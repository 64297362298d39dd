//! Convert serde_json::Value to types that sqlx can bind.

use crate::error::AppError;
use crate::sql::IdValue;
use serde_json::Value;
use sqlx::encode::{Encode, IsNull};
use sqlx::sqlite::{Sqlite, SqliteTypeInfo};
use sqlx::Database;

/// A value that can be bound to a `?` placeholder.
#[derive(Clone, Debug, PartialEq)]
pub enum BindValue {
    Null,
    Bool(bool),
    I64(i64),
    F64(f64),
    String(String),
}

impl BindValue {
    /// Scalars only. Arrays and objects have no column representation, so they
    /// are a binding error rather than being stored as opaque JSON.
    pub fn from_json(v: &Value) -> Result<Self, AppError> {
        Ok(match v {
            Value::Null => BindValue::Null,
            Value::Bool(b) => BindValue::Bool(*b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    BindValue::I64(i)
                } else if n.is_u64() {
                    return Err(AppError::Binding(format!("integer {} out of range", n)));
                } else if let Some(f) = n.as_f64() {
                    BindValue::F64(f)
                } else {
                    return Err(AppError::Binding(format!("unrepresentable number {}", n)));
                }
            }
            Value::String(s) => BindValue::String(s.clone()),
            Value::Array(_) => return Err(AppError::Binding("cannot bind array value".into())),
            Value::Object(_) => return Err(AppError::Binding("cannot bind object value".into())),
        })
    }
}

impl From<IdValue> for BindValue {
    fn from(id: IdValue) -> Self {
        BindValue::I64(id.get())
    }
}

impl<'q> Encode<'q, Sqlite> for BindValue {
    fn encode_by_ref(
        &self,
        buf: &mut <Sqlite as Database>::ArgumentBuffer<'q>,
    ) -> Result<IsNull, Box<dyn std::error::Error + Send + Sync>> {
        Ok(match self {
            BindValue::Null => <Option<i64> as Encode<Sqlite>>::encode_by_ref(&None, buf)?,
            BindValue::Bool(b) => <bool as Encode<Sqlite>>::encode_by_ref(b, buf)?,
            BindValue::I64(n) => <i64 as Encode<Sqlite>>::encode_by_ref(n, buf)?,
            BindValue::F64(n) => <f64 as Encode<Sqlite>>::encode_by_ref(n, buf)?,
            BindValue::String(s) => <String as Encode<Sqlite>>::encode_by_ref(s, buf)?,
        })
    }
}

impl sqlx::Type<Sqlite> for BindValue {
    fn type_info() -> SqliteTypeInfo {
        <String as sqlx::Type<Sqlite>>::type_info()
    }
}
