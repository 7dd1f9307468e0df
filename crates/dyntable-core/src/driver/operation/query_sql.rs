use super::Operation;
use crate::stmt::Statement;

#[derive(Debug)]
pub struct QuerySql {
    /// The SQL statement to execute
    pub stmt: Statement,
}

impl From<QuerySql> for Operation {
    fn from(value: QuerySql) -> Self {
        Self::QuerySql(value)
    }
}
