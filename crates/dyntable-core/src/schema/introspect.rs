use super::FieldType;
use crate::{stmt::Value, Error, Result};

use serde::{Deserialize, Serialize};

/// A table discovered in a database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableInfo {
    pub name: String,

    /// Schema (PostgreSQL) or database (MySQL) the table lives in. `None`
    /// for SQLite.
    pub schema: Option<String>,
}

/// A column discovered in a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub name: String,

    /// Declared type as reported by the database, lowercased.
    pub data_type: String,

    pub is_primary_key: bool,
    pub is_nullable: bool,
}

impl ColumnInfo {
    /// Coerces a caller-supplied key to the column's declared type, so that
    /// string ids from a transport bind against numeric keys.
    ///
    /// Columns without a recognized type get the key unchanged.
    pub fn coerce_key(&self, id: Value) -> Result<Value> {
        if id.is_null() {
            return Err(Error::validation("record id is required"));
        }

        let invalid = |id: &Value| {
            Error::validation(format!(
                "`{}` is not a valid key for column `{}` ({})",
                id.to_label(),
                self.name,
                self.data_type
            ))
        };

        let field_type = match base_type(&self.data_type) {
            "int" | "integer" | "int2" | "int4" | "int8" | "smallint" | "bigint" | "tinyint"
            | "mediumint" | "serial" | "bigserial" | "smallserial" => {
                return match &id {
                    Value::I64(_) => Ok(id),
                    Value::F64(n) if n.fract() == 0.0 && n.abs() < i64::MAX as f64 => {
                        Ok(Value::I64(*n as i64))
                    }
                    Value::String(s) => s
                        .trim()
                        .parse()
                        .map(Value::I64)
                        .map_err(|_| invalid(&id)),
                    _ => Err(invalid(&id)),
                };
            }
            "numeric" | "decimal" | "real" | "float" | "float4" | "float8" | "double" => {
                FieldType::Number
            }
            "bool" | "boolean" => FieldType::Boolean,
            "date" => FieldType::Date,
            "timestamp" | "timestamptz" | "datetime" => FieldType::Datetime,
            "" => return Ok(id),
            _ => FieldType::Text,
        };

        match field_type.coerce_filter(id.clone()) {
            Ok(value) => Ok(value),
            Err(_) => Err(invalid(&id)),
        }
    }
}

/// `bigint(20) unsigned` -> `bigint`
fn base_type(data_type: &str) -> &str {
    data_type
        .split(|c: char| c == '(' || c.is_whitespace())
        .next()
        .unwrap_or_default()
}
