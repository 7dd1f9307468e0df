mod add_column;
pub use add_column::AddColumn;

mod column_def;
pub use column_def::ColumnDef;

mod create_table;
pub use create_table::CreateTable;

mod delete;
pub use delete::Delete;

mod drop_column;
pub use drop_column::DropColumn;

mod drop_table;
pub use drop_table::DropTable;

mod expr;
pub use expr::{BinaryOp, Expr, ExprBinaryOp, ExprFunc, ExprInList, ExprIsNull, ExprLike};

mod insert;
pub use insert::Insert;

mod name;
pub use name::Name;

mod order_by;
pub use order_by::{Direction, OrderByExpr};

mod query;
pub use query::{Limit, Query};

mod ty;
pub use ty::Type;

mod update;
pub use update::{Assignment, Update};

mod value;
pub use value::Value;

mod value_record;
pub use value_record::ValueRecord;

/// A SQL statement the engine hands to a driver.
///
/// Statements carry identifiers that were validated on construction. Values
/// never appear inline; the serializer turns every [`Value`] into a bound
/// parameter.
#[derive(Debug, Clone)]
pub enum Statement {
    AddColumn(AddColumn),
    CreateTable(CreateTable),
    Delete(Delete),
    DropColumn(DropColumn),
    DropTable(DropTable),
    Insert(Insert),
    Query(Query),
    Update(Update),
}

impl Statement {
    /// Returns `true` for statements that only read.
    pub fn is_query(&self) -> bool {
        matches!(self, Statement::Query(_))
    }

    /// Returns `true` for schema-changing statements.
    pub fn is_ddl(&self) -> bool {
        matches!(
            self,
            Statement::AddColumn(_)
                | Statement::CreateTable(_)
                | Statement::DropColumn(_)
                | Statement::DropTable(_)
        )
    }

    /// Returns `true` if executing the statement produces rows.
    pub fn returns_rows(&self) -> bool {
        match self {
            Statement::Query(_) => true,
            Statement::Insert(insert) => insert.returning.is_some(),
            _ => false,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Statement::AddColumn(_) => "add_column",
            Statement::CreateTable(_) => "create_table",
            Statement::Delete(_) => "delete",
            Statement::DropColumn(_) => "drop_column",
            Statement::DropTable(_) => "drop_table",
            Statement::Insert(_) => "insert",
            Statement::Query(_) => "query",
            Statement::Update(_) => "update",
        }
    }

    /// The table the statement operates on.
    pub fn table(&self) -> &Name {
        match self {
            Statement::AddColumn(stmt) => &stmt.table,
            Statement::CreateTable(stmt) => &stmt.name,
            Statement::Delete(stmt) => &stmt.table,
            Statement::DropColumn(stmt) => &stmt.table,
            Statement::DropTable(stmt) => &stmt.name,
            Statement::Insert(stmt) => &stmt.table,
            Statement::Query(stmt) => &stmt.from,
            Statement::Update(stmt) => &stmt.table,
        }
    }
}
