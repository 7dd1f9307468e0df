use super::{Comma, Flavor, Formatter, Ident, Params, ToSql};

use dyntable_core::stmt::{self, Statement};

impl ToSql for &Statement {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        match self {
            Statement::AddColumn(stmt) => stmt.to_sql(f),
            Statement::CreateTable(stmt) => stmt.to_sql(f),
            Statement::Delete(stmt) => stmt.to_sql(f),
            Statement::DropColumn(stmt) => stmt.to_sql(f),
            Statement::DropTable(stmt) => stmt.to_sql(f),
            Statement::Insert(stmt) => stmt.to_sql(f),
            Statement::Query(stmt) => stmt.to_sql(f),
            Statement::Update(stmt) => stmt.to_sql(f),
        }
    }
}

impl ToSql for &stmt::AddColumn {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let (table, column) = (&self.table, &self.column);
        fmt!(f, "ALTER TABLE " table " ADD COLUMN " column);
    }
}

impl ToSql for &stmt::CreateTable {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let name = &self.name;
        fmt!(f, "CREATE TABLE " name " (");

        let mut s = "\n    ";
        for column in &self.columns {
            fmt!(f, s column);
            s = ",\n    ";
        }

        fmt!(f, "\n)");
    }
}

impl ToSql for &stmt::Delete {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let table = &self.table;
        fmt!(f, "DELETE FROM " table);

        if let Some(filter) = &self.filter {
            fmt!(f, " WHERE " filter);
        }
    }
}

impl ToSql for &stmt::DropColumn {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let table = &self.table;
        fmt!(f, "ALTER TABLE " table " DROP COLUMN " Ident(&self.name));
    }
}

impl ToSql for &stmt::DropTable {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let if_exists = if self.if_exists { "IF EXISTS " } else { "" };
        let name = &self.name;
        fmt!(f, "DROP TABLE " if_exists name);
    }
}

impl ToSql for &stmt::Insert {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let table = &self.table;
        fmt!(f, "INSERT INTO " table " (" Comma(self.columns.iter().map(Ident)) ") VALUES ");

        let mut s = "";
        for row in &self.rows {
            fmt!(f, s "(" Comma(row.iter().map(Bind)) ")");
            s = ", ";
        }

        // MySQL drivers recover the key with `LAST_INSERT_ID()`.
        if let Some(returning) = &self.returning {
            if f.serializer.flavor != Flavor::Mysql {
                fmt!(f, " RETURNING " Ident(returning));
            }
        }
    }
}

impl ToSql for &stmt::Query {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let from = &self.from;
        fmt!(f, "SELECT " Comma(&self.returning) " FROM " from);

        if let Some(filter) = &self.filter {
            fmt!(f, " WHERE " filter);
        }

        if !self.group_by.is_empty() {
            fmt!(f, " GROUP BY " Comma(&self.group_by));
        }

        if !self.order_by.is_empty() {
            fmt!(f, " ORDER BY " Comma(&self.order_by));
        }

        if let Some(limit) = &self.limit {
            fmt!(f, " LIMIT " limit.limit);

            if let Some(offset) = limit.offset {
                fmt!(f, " OFFSET " offset);
            }
        }
    }
}

impl ToSql for &stmt::Update {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let table = &self.table;
        fmt!(f, "UPDATE " table " SET ");

        let mut s = "";
        for assignment in &self.assignments {
            fmt!(f, s Ident(&assignment.column) " = " Bind(&assignment.value));
            s = ", ";
        }

        if let Some(filter) = &self.filter {
            fmt!(f, " WHERE " filter);
        }
    }
}

impl ToSql for &stmt::OrderByExpr {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let order = match self.order {
            stmt::Direction::Asc => " ASC",
            stmt::Direction::Desc => " DESC",
        };
        fmt!(f, &self.expr order);
    }
}

/// A value written as a bound parameter.
pub(super) struct Bind<'a>(pub(super) &'a stmt::Value);

impl ToSql for Bind<'_> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let placeholder = f.params.push(self.0);
        fmt!(f, placeholder);
    }
}
