use super::{Expr, Name, Statement};

#[derive(Debug, Clone)]
pub struct Delete {
    /// Table to delete from
    pub table: Name,

    /// Rows to delete. `None` is refused by the serializer so that a
    /// forgotten filter can never empty a table.
    pub filter: Option<Expr>,
}

impl Statement {
    pub fn delete(table: Name, filter: Expr) -> Self {
        Delete {
            table,
            filter: Some(filter),
        }
        .into()
    }
}

impl From<Delete> for Statement {
    fn from(value: Delete) -> Self {
        Self::Delete(value)
    }
}
