use super::{Name, Statement, Value};

#[derive(Debug, Clone)]
pub struct Insert {
    /// Target table
    pub table: Name,

    /// Columns being written, in the order of each row's values
    pub columns: Vec<String>,

    /// One entry per inserted row
    pub rows: Vec<Vec<Value>>,

    /// Generated key column to return. MySQL has no `RETURNING`; its driver
    /// recovers the key with `LAST_INSERT_ID()` instead.
    pub returning: Option<String>,
}

impl Statement {
    pub fn insert(table: Name, columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Insert {
            table,
            columns,
            rows,
            returning: None,
        }
        .into()
    }
}

impl From<Insert> for Statement {
    fn from(value: Insert) -> Self {
        Self::Insert(value)
    }
}
