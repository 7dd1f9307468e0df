#[macro_use]
mod fmt;
use fmt::ToSql;

mod delim;
use delim::{Comma, Delimited};

mod flavor;
pub use flavor::Flavor;

mod ident;
use ident::Ident;

mod params;
pub use params::{Params, Placeholder};

// Fragment serializers
mod column_def;
mod expr;
mod name;
mod statement;
mod ty;

use dyntable_core::{
    driver::operation::Transaction,
    stmt::{Name, Statement},
    Error, Result,
};

/// Serialize a statement to a SQL string
#[derive(Debug, Clone, Copy)]
pub struct Serializer {
    /// The database flavor handles the differences between SQL dialects and
    /// supported features.
    flavor: Flavor,
}

struct Formatter<'a, T> {
    /// Handle to the serializer
    serializer: &'a Serializer,

    /// Where to write the serialized SQL
    dst: &'a mut String,

    /// Where to store parameters
    params: &'a mut T,
}

impl Serializer {
    /// Serializes `stmt`, pushing every value it carries into `params`.
    ///
    /// `UPDATE` and `DELETE` statements without a filter are refused.
    pub fn serialize(&self, stmt: &Statement, params: &mut impl Params) -> Result<String> {
        match stmt {
            Statement::Update(update) if update.filter.is_none() => {
                return Err(Error::validation(format!(
                    "refusing to update every row of `{}`",
                    update.table
                )));
            }
            Statement::Update(update) if update.assignments.is_empty() => {
                return Err(Error::validation("update has no assignments"));
            }
            Statement::Delete(delete) if delete.filter.is_none() => {
                return Err(Error::validation(format!(
                    "refusing to delete every row of `{}`",
                    delete.table
                )));
            }
            Statement::Insert(insert) if insert.rows.is_empty() => {
                return Err(Error::validation("insert has no rows"));
            }
            _ => {}
        }

        let mut ret = String::new();

        let mut fmt = Formatter {
            serializer: self,
            dst: &mut ret,
            params,
        };

        stmt.to_sql(&mut fmt);

        ret.push(';');
        Ok(ret)
    }

    /// Serialize a transaction control operation to a SQL string.
    ///
    /// SQLite has no read-only transactions; the flag is ignored there.
    pub fn serialize_transaction(&self, op: &Transaction) -> String {
        match op {
            Transaction::Start { read_only } => match self.flavor {
                Flavor::Mysql if *read_only => "START TRANSACTION READ ONLY",
                Flavor::Mysql => "START TRANSACTION",
                Flavor::Postgresql if *read_only => "BEGIN READ ONLY",
                Flavor::Postgresql | Flavor::Sqlite => "BEGIN",
            },
            Transaction::Commit => "COMMIT",
            Transaction::Rollback => "ROLLBACK",
        }
        .to_string()
    }

    /// Lists the base tables visible to the connection. Each row is
    /// `(name, schema)`; see [`crate::introspect::table_info`].
    pub fn serialize_list_tables(&self) -> String {
        match self.flavor {
            Flavor::Postgresql => "SELECT table_name::text, table_schema::text \
                 FROM information_schema.tables \
                 WHERE table_type = 'BASE TABLE' \
                 AND table_schema NOT IN ('pg_catalog', 'information_schema') \
                 ORDER BY table_schema, table_name;"
                .to_string(),
            Flavor::Mysql => "SELECT TABLE_NAME AS table_name, TABLE_SCHEMA AS table_schema \
                 FROM information_schema.tables \
                 WHERE table_type = 'BASE TABLE' AND table_schema = DATABASE() \
                 ORDER BY table_name;"
                .to_string(),
            Flavor::Sqlite => "SELECT name, NULL \
                 FROM sqlite_master \
                 WHERE type = 'table' AND name NOT LIKE 'sqlite_%' \
                 ORDER BY name;"
                .to_string(),
        }
    }

    /// Lists the columns of `table` in declaration order. Each row is
    /// `(name, data_type, is_primary_key, is_nullable)`; see
    /// [`crate::introspect::column_info`].
    ///
    /// PostgreSQL's `information_schema` uses domain types; they are cast to
    /// `text` so drivers decode plain strings.
    pub fn serialize_list_columns(&self, table: &Name, params: &mut impl Params) -> String {
        let mut ret = String::new();
        let mut f = Formatter {
            serializer: self,
            dst: &mut ret,
            params,
        };

        match self.flavor {
            Flavor::Postgresql => {
                fmt!(&mut f,
                    "SELECT c.column_name::text, c.data_type::text, \
                     EXISTS (\
                     SELECT 1 FROM information_schema.table_constraints tc \
                     JOIN information_schema.key_column_usage kcu \
                     ON tc.constraint_name = kcu.constraint_name \
                     AND tc.table_schema = kcu.table_schema \
                     AND tc.table_name = kcu.table_name \
                     WHERE tc.constraint_type = 'PRIMARY KEY' \
                     AND tc.table_schema = c.table_schema \
                     AND tc.table_name = c.table_name \
                     AND kcu.column_name = c.column_name), \
                     c.is_nullable = 'YES' \
                     FROM information_schema.columns c \
                     WHERE c.table_schema::text = "
                );
                match table.schema() {
                    Some(schema) => fmt!(&mut f, f.params.push(&schema.into())),
                    None => fmt!(&mut f, "current_schema()"),
                }
                fmt!(&mut f,
                    " AND c.table_name::text = " f.params.push(&table.table().into())
                    " ORDER BY c.ordinal_position;"
                );
            }
            Flavor::Mysql => {
                fmt!(&mut f,
                    "SELECT COLUMN_NAME, DATA_TYPE, COLUMN_KEY = 'PRI', IS_NULLABLE = 'YES' \
                     FROM information_schema.columns \
                     WHERE TABLE_SCHEMA = "
                );
                match table.schema() {
                    Some(schema) => fmt!(&mut f, f.params.push(&schema.into())),
                    None => fmt!(&mut f, "DATABASE()"),
                }
                fmt!(&mut f,
                    " AND TABLE_NAME = " f.params.push(&table.table().into())
                    " ORDER BY ORDINAL_POSITION;"
                );
            }
            Flavor::Sqlite => {
                fmt!(&mut f,
                    "SELECT name, lower(type), pk > 0, (\"notnull\" = 0 AND pk = 0) \
                     FROM pragma_table_info(" f.params.push(&table.table().into()) ") \
                     ORDER BY cid;"
                );
            }
        }

        ret
    }

    /// Statement used to check that a connection is alive.
    pub fn serialize_ping(&self) -> &'static str {
        "SELECT 1;"
    }
}
