use super::{ColumnDef, Name, Statement};

#[derive(Debug, Clone)]
pub struct CreateTable {
    /// Name of the table
    pub name: Name,

    /// Column definitions
    pub columns: Vec<ColumnDef>,
}

impl Statement {
    pub fn create_table(name: Name, columns: Vec<ColumnDef>) -> Self {
        CreateTable { name, columns }.into()
    }
}

impl From<CreateTable> for Statement {
    fn from(value: CreateTable) -> Self {
        Self::CreateTable(value)
    }
}
