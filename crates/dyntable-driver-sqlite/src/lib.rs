mod error;
use error::classify;

mod value;
pub(crate) use value::Value;

use dyntable_core::{
    async_trait,
    driver::{
        operation::{ListColumns, Operation},
        Capability, Driver, Response,
    },
    stmt::ValueRecord,
    Result,
};
use dyntable_sql::{introspect, Serializer};
use rusqlite::{Connection as RusqliteConnection, OpenFlags};
use std::path::{Path, PathBuf};
use url::Url;

#[derive(Debug)]
pub enum Sqlite {
    File { path: PathBuf, read_only: bool },
    InMemory,
}

impl Sqlite {
    /// Create a new SQLite driver with an arbitrary connection URL
    ///
    /// Accepts `sqlite::memory:` and `sqlite:<path>`. A `mode=ro` query
    /// parameter opens the file read-only.
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let url_str = url.into();
        let url = Url::parse(&url_str).map_err(dyntable_core::Error::driver_operation_failed)?;

        if url.scheme() != "sqlite" {
            return Err(dyntable_core::Error::invalid_connection_url(format!(
                "connection URL does not have a `sqlite` scheme; url={url_str}"
            )));
        }

        if url.path() == ":memory:" {
            return Ok(Self::InMemory);
        }

        let read_only = url
            .query_pairs()
            .any(|(key, value)| key == "mode" && value == "ro");

        Ok(Self::File {
            path: PathBuf::from(url.path()),
            read_only,
        })
    }

    /// Create an in-memory SQLite database
    pub fn in_memory() -> Self {
        Self::InMemory
    }

    /// Open a SQLite database at the specified file path, creating it if
    /// needed
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        Self::File {
            path: path.as_ref().to_path_buf(),
            read_only: false,
        }
    }

    /// Open an existing SQLite database without write access
    pub fn open_read_only<P: AsRef<Path>>(path: P) -> Self {
        Self::File {
            path: path.as_ref().to_path_buf(),
            read_only: true,
        }
    }
}

#[async_trait]
impl Driver for Sqlite {
    fn capability(&self) -> &'static Capability {
        &Capability::SQLITE
    }

    async fn connect(&self) -> Result<Box<dyn dyntable_core::Connection>> {
        let connection = match self {
            Sqlite::File { path, read_only } => Connection::open(path, *read_only)?,
            Sqlite::InMemory => Connection::in_memory()?,
        };
        Ok(Box::new(connection))
    }

    fn max_connections(&self) -> Option<usize> {
        matches!(self, Self::InMemory).then_some(1)
    }
}

#[derive(Debug)]
pub struct Connection {
    connection: RusqliteConnection,
}

impl Connection {
    pub fn in_memory() -> Result<Self> {
        let connection = RusqliteConnection::open_in_memory().map_err(classify)?;
        Ok(Self { connection })
    }

    pub fn open<P: AsRef<Path>>(path: P, read_only: bool) -> Result<Self> {
        let flags = if read_only {
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX
        } else {
            OpenFlags::default()
        };

        let connection = RusqliteConnection::open_with_flags(path, flags).map_err(classify)?;
        Ok(Self { connection })
    }

    fn query(
        &mut self,
        sql: &str,
        params: Vec<dyntable_core::stmt::Value>,
    ) -> Result<Vec<ValueRecord>> {
        let mut stmt = self.connection.prepare_cached(sql).map_err(classify)?;
        let width = stmt.column_count();

        let params = params.into_iter().map(Value::from).collect::<Vec<_>>();
        let mut rows = stmt
            .query(rusqlite::params_from_iter(params.iter()))
            .map_err(classify)?;

        let mut ret = vec![];

        while let Some(row) = rows.next().map_err(classify)? {
            let mut items = Vec::with_capacity(width);

            for index in 0..width {
                items.push(Value::from_sql(row, index).map_err(classify)?.into_inner());
            }

            ret.push(ValueRecord::from_vec(items));
        }

        Ok(ret)
    }

    fn execute(&mut self, sql: &str, params: Vec<dyntable_core::stmt::Value>) -> Result<u64> {
        let mut stmt = self.connection.prepare_cached(sql).map_err(classify)?;
        let params = params.into_iter().map(Value::from).collect::<Vec<_>>();
        let count = stmt
            .execute(rusqlite::params_from_iter(params.iter()))
            .map_err(classify)?;
        Ok(count as u64)
    }
}

#[async_trait]
impl dyntable_core::driver::Connection for Connection {
    fn capability(&self) -> &'static Capability {
        &Capability::SQLITE
    }

    async fn exec(&mut self, op: Operation) -> Result<Response> {
        let serializer = Serializer::sqlite();

        match op {
            Operation::QuerySql(op) => {
                let mut params = vec![];
                let sql = serializer.serialize(&op.stmt, &mut params)?;
                tracing::debug!(db.statement = %sql, "sqlite");

                if op.stmt.returns_rows() {
                    Ok(Response::values(self.query(&sql, params)?))
                } else {
                    Ok(Response::count(self.execute(&sql, params)?))
                }
            }
            Operation::Transaction(op) => {
                let sql = serializer.serialize_transaction(&op);
                tracing::trace!(db.statement = %sql, "sqlite");
                self.connection.execute_batch(&sql).map_err(classify)?;
                Ok(Response::count(0))
            }
            Operation::ListTables => {
                let rows = self.query(&serializer.serialize_list_tables(), vec![])?;
                let tables = rows
                    .into_iter()
                    .map(introspect::table_info)
                    .collect::<Result<_>>()?;
                Ok(Response::tables(tables))
            }
            Operation::ListColumns(ListColumns { table }) => {
                let mut params = vec![];
                let sql = serializer.serialize_list_columns(&table, &mut params);
                let rows = self.query(&sql, params)?;
                let columns = rows
                    .into_iter()
                    .map(introspect::column_info)
                    .collect::<Result<_>>()?;
                Ok(Response::columns(columns))
            }
            Operation::Ping => {
                self.query(serializer.serialize_ping(), vec![])?;
                Ok(Response::count(0))
            }
        }
    }
}
