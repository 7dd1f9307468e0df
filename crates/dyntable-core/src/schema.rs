mod field;
pub use field::{AppField, FieldConstraints};

mod field_type;
pub use field_type::FieldType;

pub mod ident;

mod introspect;
pub use introspect::{ColumnInfo, TableInfo};

pub mod system;
