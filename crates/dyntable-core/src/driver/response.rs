use crate::{
    err,
    schema::{ColumnInfo, TableInfo},
    stmt::ValueRecord,
    Result,
};

#[derive(Debug)]
pub struct Response {
    pub rows: Rows,
}

#[derive(Debug)]
pub enum Rows {
    /// Number of rows impacted by the operation
    Count(u64),

    /// Rows returned by a query, each in `returning` order
    Values(Vec<ValueRecord>),

    /// Result of table introspection
    Tables(Vec<TableInfo>),

    /// Result of column introspection
    Columns(Vec<ColumnInfo>),
}

impl Response {
    pub fn count(count: u64) -> Self {
        Self {
            rows: Rows::Count(count),
        }
    }

    pub fn values(values: Vec<ValueRecord>) -> Self {
        Self {
            rows: Rows::Values(values),
        }
    }

    pub fn tables(tables: Vec<TableInfo>) -> Self {
        Self {
            rows: Rows::Tables(tables),
        }
    }

    pub fn columns(columns: Vec<ColumnInfo>) -> Self {
        Self {
            rows: Rows::Columns(columns),
        }
    }
}

impl Rows {
    pub fn is_count(&self) -> bool {
        matches!(self, Self::Count(_))
    }

    pub fn is_values(&self) -> bool {
        matches!(self, Self::Values(_))
    }

    fn kind(&self) -> &'static str {
        match self {
            Rows::Count(_) => "count",
            Rows::Values(_) => "values",
            Rows::Tables(_) => "tables",
            Rows::Columns(_) => "columns",
        }
    }

    pub fn into_count(self) -> Result<u64> {
        match self {
            Rows::Count(count) => Ok(count),
            _ => Err(err!("expected a row count; got {}", self.kind())),
        }
    }

    pub fn into_values(self) -> Result<Vec<ValueRecord>> {
        match self {
            Rows::Values(values) => Ok(values),
            _ => Err(err!("expected rows; got {}", self.kind())),
        }
    }

    pub fn into_tables(self) -> Result<Vec<TableInfo>> {
        match self {
            Rows::Tables(tables) => Ok(tables),
            _ => Err(err!("expected tables; got {}", self.kind())),
        }
    }

    pub fn into_columns(self) -> Result<Vec<ColumnInfo>> {
        match self {
            Rows::Columns(columns) => Ok(columns),
            _ => Err(err!("expected columns; got {}", self.kind())),
        }
    }
}
