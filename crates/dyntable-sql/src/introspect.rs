//! Decoding of the rows produced by the introspection queries.

use dyntable_core::{
    err,
    schema::{ColumnInfo, TableInfo},
    stmt::{Value, ValueRecord},
    Result,
};

/// Decodes a `(name, schema)` row.
pub fn table_info(record: ValueRecord) -> Result<TableInfo> {
    let mut fields = record.into_iter();

    let name = text(fields.next(), "table name")?;
    let schema = match fields.next() {
        None | Some(Value::Null) => None,
        value => Some(text(value, "table schema")?),
    };

    Ok(TableInfo { name, schema })
}

/// Decodes a `(name, data_type, is_primary_key, is_nullable)` row.
pub fn column_info(record: ValueRecord) -> Result<ColumnInfo> {
    let mut fields = record.into_iter();

    Ok(ColumnInfo {
        name: text(fields.next(), "column name")?,
        data_type: text(fields.next(), "column type")?.to_lowercase(),
        is_primary_key: flag(fields.next(), "primary key flag")?,
        is_nullable: flag(fields.next(), "nullable flag")?,
    })
}

fn text(value: Option<Value>, what: &str) -> Result<String> {
    match value {
        Some(Value::String(s)) => Ok(s),
        other => Err(err!("introspection: expected {what} as text; got {other:?}")),
    }
}

/// Booleans arrive as `BOOLEAN` from PostgreSQL and as integers from MySQL
/// and SQLite.
fn flag(value: Option<Value>, what: &str) -> Result<bool> {
    match value {
        Some(Value::Bool(b)) => Ok(b),
        Some(Value::I64(n)) => Ok(n != 0),
        other => Err(err!("introspection: expected {what}; got {other:?}")),
    }
}
