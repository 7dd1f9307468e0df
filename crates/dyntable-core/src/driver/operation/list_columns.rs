use super::Operation;
use crate::stmt::Name;

#[derive(Debug)]
pub struct ListColumns {
    pub table: Name,
}

impl From<ListColumns> for Operation {
    fn from(value: ListColumns) -> Self {
        Self::ListColumns(value)
    }
}
