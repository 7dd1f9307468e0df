use super::{Name, Statement};

/// A statement to drop a column from a table.
#[derive(Debug, Clone)]
pub struct DropColumn {
    /// Table to drop the column from.
    pub table: Name,

    /// Name of the column.
    pub name: String,
}

impl Statement {
    /// Drops a column.
    pub fn drop_column(table: Name, name: impl Into<String>) -> Self {
        DropColumn {
            table,
            name: name.into(),
        }
        .into()
    }
}

impl From<DropColumn> for Statement {
    fn from(value: DropColumn) -> Self {
        Self::DropColumn(value)
    }
}
