mod list_columns;
pub use list_columns::ListColumns;

mod query_sql;
pub use query_sql::QuerySql;

mod transaction;
pub use transaction::Transaction;

use crate::stmt::Statement;

#[derive(Debug)]
pub enum Operation {
    /// Execute a SQL statement
    QuerySql(QuerySql),

    /// Execute a transaction lifecycle op
    Transaction(Transaction),

    /// List the user tables visible to the connection
    ListTables,

    /// List the columns of a table
    ListColumns(ListColumns),

    /// Round-trip to the server
    Ping,
}

impl Operation {
    /// Returns `true` when the operation cannot change data or schema.
    pub fn is_read_only(&self) -> bool {
        match self {
            Operation::QuerySql(op) => op.stmt.is_query(),
            Operation::Transaction(_) => true,
            Operation::ListTables | Operation::ListColumns(_) | Operation::Ping => true,
        }
    }
}

impl From<Statement> for Operation {
    fn from(stmt: Statement) -> Self {
        Operation::QuerySql(QuerySql { stmt })
    }
}
