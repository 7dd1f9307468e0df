use super::{Flavor, Params, ToSql};

use dyntable_core::stmt;

impl ToSql for &stmt::Type {
    fn to_sql<T: Params>(self, f: &mut super::Formatter<'_, T>) {
        use stmt::Type::*;

        let flavor = f.serializer.flavor;

        match (self, flavor) {
            (Boolean, _) => fmt!(f, "BOOLEAN"),
            (BigInt, _) => fmt!(f, "BIGINT"),
            (Numeric, Flavor::Mysql) => fmt!(f, "DECIMAL(38, 10)"),
            (Numeric, _) => fmt!(f, "NUMERIC"),
            (VarChar(size), _) => {
                fmt!(f, "VARCHAR(");
                fmt!(f, *size ")");
            }
            (Text, _) => fmt!(f, "TEXT"),
            // SQLite has no date types; values are stored as sortable text.
            (Date | Timestamp, Flavor::Sqlite) => fmt!(f, "TEXT"),
            (Date, _) => fmt!(f, "DATE"),
            (Timestamp, Flavor::Mysql) => fmt!(f, "DATETIME(6)"),
            (Timestamp, _) => fmt!(f, "TIMESTAMP"),
        }
    }
}
