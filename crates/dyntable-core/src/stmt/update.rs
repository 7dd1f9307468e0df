use super::{Expr, Name, Statement, Value};

#[derive(Debug, Clone)]
pub struct Update {
    /// Target table
    pub table: Name,

    /// `SET` list
    pub assignments: Vec<Assignment>,

    /// Rows to update. Like [`super::Delete`], an update without a filter is
    /// refused by the serializer.
    pub filter: Option<Expr>,
}

#[derive(Debug, Clone)]
pub struct Assignment {
    pub column: String,
    pub value: Value,
}

impl Statement {
    pub fn update(table: Name, assignments: Vec<Assignment>, filter: Expr) -> Self {
        Update {
            table,
            assignments,
            filter: Some(filter),
        }
        .into()
    }
}

impl From<Update> for Statement {
    fn from(value: Update) -> Self {
        Self::Update(value)
    }
}
