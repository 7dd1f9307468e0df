//! System columns present on every managed table.
//!
//! Managed field columns are always prefixed (see [`AppField::column_name`]),
//! so a field code can never shadow one of these.
//!
//! [`AppField::column_name`]: super::AppField::column_name

pub const ID: &str = "id";
pub const CREATED_BY: &str = "created_by";
pub const CREATED_AT: &str = "created_at";
pub const UPDATED_AT: &str = "updated_at";

/// Prefix of managed field columns.
pub const FIELD_COLUMN_PREFIX: &str = "f_";

/// System columns a caller may sort by.
pub const SORTABLE: [&str; 3] = [ID, CREATED_AT, UPDATED_AT];

pub fn is_system_column(name: &str) -> bool {
    matches!(name, ID | CREATED_BY | CREATED_AT | UPDATED_AT)
}
