use super::{Flavor, Ident, Params, ToSql};

use dyntable_core::stmt;

impl ToSql for &stmt::ColumnDef {
    fn to_sql<T: Params>(self, f: &mut super::Formatter<'_, T>) {
        fmt!(f, Ident(&self.name) " ");

        if self.auto_increment {
            match f.serializer.flavor {
                // SQLite only aliases the rowid when the type is exactly
                // `INTEGER`.
                Flavor::Sqlite => fmt!(f, "INTEGER PRIMARY KEY AUTOINCREMENT"),
                Flavor::Postgresql => {
                    fmt!(f, &self.ty " GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY")
                }
                Flavor::Mysql => fmt!(f, &self.ty " NOT NULL AUTO_INCREMENT PRIMARY KEY"),
            }
            return;
        }

        fmt!(f, &self.ty);

        if !self.nullable {
            fmt!(f, " NOT NULL");
        }

        if self.primary_key {
            fmt!(f, " PRIMARY KEY");
        }
    }
}
