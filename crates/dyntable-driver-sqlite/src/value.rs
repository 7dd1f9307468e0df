use dyntable_core::stmt::Value as CoreValue;
use rusqlite::{
    types::{ToSql, ToSqlOutput, Value as SqlValue, ValueRef},
    Row,
};

/// Text layout of `DATE` values. Sorts lexicographically.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Text layout of `TIMESTAMP` values. Fixed width so that text comparison
/// orders timestamps correctly.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

#[derive(Debug)]
pub struct Value(CoreValue);

impl From<CoreValue> for Value {
    fn from(value: CoreValue) -> Self {
        Self(value)
    }
}

impl Value {
    /// Converts this SQLite driver value into the core value.
    pub fn into_inner(self) -> CoreValue {
        self.0
    }

    /// Converts a SQLite value within a row to a core value.
    ///
    /// SQLite is dynamically typed, so the storage class decides the
    /// variant. The engine normalizes it against the field type afterwards.
    pub fn from_sql(row: &Row, index: usize) -> rusqlite::Result<Self> {
        let core_value = match row.get_ref(index)? {
            ValueRef::Null => CoreValue::Null,
            ValueRef::Integer(value) => CoreValue::I64(value),
            ValueRef::Real(value) => CoreValue::F64(value),
            ValueRef::Text(value) | ValueRef::Blob(value) => {
                CoreValue::String(String::from_utf8_lossy(value).into_owned())
            }
        };

        Ok(Value(core_value))
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        match &self.0 {
            CoreValue::Null => Ok(ToSqlOutput::Owned(SqlValue::Null)),
            CoreValue::Bool(v) => Ok(ToSqlOutput::Owned(SqlValue::Integer(*v as i64))),
            CoreValue::I64(v) => Ok(ToSqlOutput::Owned(SqlValue::Integer(*v))),
            CoreValue::F64(v) => Ok(ToSqlOutput::Owned(SqlValue::Real(*v))),
            CoreValue::String(v) => Ok(ToSqlOutput::Borrowed(ValueRef::Text(v.as_bytes()))),
            CoreValue::Date(v) => Ok(ToSqlOutput::Owned(SqlValue::Text(
                v.format(DATE_FORMAT).to_string(),
            ))),
            CoreValue::Timestamp(v) => Ok(ToSqlOutput::Owned(SqlValue::Text(
                v.format(TIMESTAMP_FORMAT).to_string(),
            ))),
        }
    }
}
