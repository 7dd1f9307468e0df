use super::Type;

#[derive(Debug, Clone)]
pub struct ColumnDef {
    pub name: String,
    pub ty: Type,
    pub nullable: bool,
    pub primary_key: bool,
    pub auto_increment: bool,
}

impl ColumnDef {
    /// A nullable column without constraints.
    pub fn nullable(name: impl Into<String>, ty: Type) -> ColumnDef {
        ColumnDef {
            name: name.into(),
            ty,
            nullable: true,
            primary_key: false,
            auto_increment: false,
        }
    }

    /// A `NOT NULL` column without constraints.
    pub fn not_null(name: impl Into<String>, ty: Type) -> ColumnDef {
        ColumnDef {
            nullable: false,
            ..ColumnDef::nullable(name, ty)
        }
    }

    /// An auto-incrementing 64-bit integer primary key.
    pub fn serial_primary_key(name: impl Into<String>) -> ColumnDef {
        ColumnDef {
            name: name.into(),
            ty: Type::BigInt,
            nullable: false,
            primary_key: true,
            auto_increment: true,
        }
    }
}
