mod error;
use error::{classify, classify_connect};

mod value;
pub(crate) use value::Value;

use dyntable_core::{
    async_trait,
    driver::{
        operation::{ListColumns, Operation},
        Capability, Driver, Response,
    },
    stmt::{self, Statement, ValueRecord},
    Result,
};
use dyntable_sql::{introspect, Serializer};
use mysql_async::{
    prelude::{Queryable, ToValue},
    Conn, Opts, OptsBuilder,
};
use url::Url;

#[derive(Debug, Clone)]
pub struct MySQL {
    opts: Opts,
}

impl MySQL {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let url_str = url.into();
        let url = Url::parse(&url_str).map_err(|err| {
            dyntable_core::Error::invalid_connection_url(format!("invalid MySQL URL: {err}"))
        })?;

        if url.scheme() != "mysql" {
            return Err(dyntable_core::Error::invalid_connection_url(format!(
                "connection url does not have a `mysql` scheme; scheme={}",
                url.scheme()
            )));
        }

        if url.host_str().is_none() {
            return Err(dyntable_core::Error::invalid_connection_url(
                "missing host in connection URL",
            ));
        }

        if url.path().trim_start_matches('/').is_empty() {
            return Err(dyntable_core::Error::invalid_connection_url(
                "no database specified - missing path in connection URL",
            ));
        }

        let opts = Opts::from_url(url.as_ref()).map_err(|err| {
            dyntable_core::Error::invalid_connection_url(format!("invalid MySQL URL: {err}"))
        })?;

        Ok(Self::from_opts(opts))
    }

    /// Create a MySQL driver from prepared options.
    ///
    /// Affected-row counts are switched to found rows, so an update that
    /// leaves a row unchanged still reports it as matched.
    pub fn from_opts(opts: impl Into<Opts>) -> Self {
        let opts = OptsBuilder::from_opts(opts).client_found_rows(true);
        Self { opts: opts.into() }
    }
}

#[async_trait]
impl Driver for MySQL {
    fn capability(&self) -> &'static Capability {
        &Capability::MYSQL
    }

    async fn connect(&self) -> Result<Box<dyn dyntable_core::driver::Connection>> {
        let conn = Conn::new(self.opts.clone())
            .await
            .map_err(classify_connect)?;
        Ok(Box::new(Connection::new(conn)))
    }
}

#[derive(Debug)]
pub struct Connection {
    conn: Conn,
}

impl Connection {
    pub fn new(conn: Conn) -> Self {
        Self { conn }
    }

    async fn query(&mut self, sql: &str, params: Vec<stmt::Value>) -> Result<Vec<ValueRecord>> {
        let args = params
            .into_iter()
            .map(|param| Value::from(param).to_value())
            .collect::<Vec<_>>();

        let rows: Vec<mysql_async::Row> = self.conn.exec(sql, args).await.map_err(classify)?;

        Ok(rows
            .into_iter()
            .map(|mut row| {
                let columns = row.columns();
                let fields = columns
                    .iter()
                    .enumerate()
                    .map(|(index, column)| {
                        let value = row.take(index).unwrap_or(mysql_async::Value::NULL);
                        Value::from_sql(value, column).into_inner()
                    })
                    .collect();
                ValueRecord::from_vec(fields)
            })
            .collect())
    }

    async fn execute(&mut self, sql: &str, params: Vec<stmt::Value>) -> Result<u64> {
        let args = params
            .into_iter()
            .map(|param| Value::from(param).to_value())
            .collect::<Vec<_>>();

        self.conn.exec_drop(sql, args).await.map_err(classify)?;
        Ok(self.conn.affected_rows())
    }

    /// Runs an insert and reports the generated keys.
    ///
    /// MySQL hands out consecutive keys to the rows of a single multi-row
    /// insert and `LAST_INSERT_ID()` names the first one.
    async fn insert_returning(
        &mut self,
        sql: &str,
        params: Vec<stmt::Value>,
    ) -> Result<Vec<ValueRecord>> {
        let count = self.execute(sql, params).await?;

        let first_id = self
            .conn
            .last_insert_id()
            .ok_or_else(|| dyntable_core::err!("LAST_INSERT_ID() unavailable after insert"))?;

        Ok((0..count)
            .map(|offset| {
                ValueRecord::from_vec(vec![stmt::Value::I64((first_id + offset) as i64)])
            })
            .collect())
    }
}

#[async_trait]
impl dyntable_core::driver::Connection for Connection {
    fn capability(&self) -> &'static Capability {
        &Capability::MYSQL
    }

    async fn exec(&mut self, op: Operation) -> Result<Response> {
        let serializer = Serializer::mysql();

        match op {
            Operation::QuerySql(op) => {
                let mut params = vec![];
                let sql = serializer.serialize(&op.stmt, &mut params)?;
                tracing::debug!(db.statement = %sql, "mysql");

                match &op.stmt {
                    Statement::Insert(insert) if insert.returning.is_some() => Ok(
                        Response::values(self.insert_returning(&sql, params).await?),
                    ),
                    stmt if stmt.returns_rows() => {
                        Ok(Response::values(self.query(&sql, params).await?))
                    }
                    _ => Ok(Response::count(self.execute(&sql, params).await?)),
                }
            }
            Operation::Transaction(op) => {
                let sql = serializer.serialize_transaction(&op);
                tracing::trace!(db.statement = %sql, "mysql");
                self.conn.query_drop(sql).await.map_err(classify)?;
                Ok(Response::count(0))
            }
            Operation::ListTables => {
                let rows = self.query(&serializer.serialize_list_tables(), vec![]).await?;
                let tables = rows
                    .into_iter()
                    .map(introspect::table_info)
                    .collect::<Result<_>>()?;
                Ok(Response::tables(tables))
            }
            Operation::ListColumns(ListColumns { table }) => {
                let mut params = vec![];
                let sql = serializer.serialize_list_columns(&table, &mut params);
                let rows = self.query(&sql, params).await?;
                let columns = rows
                    .into_iter()
                    .map(introspect::column_info)
                    .collect::<Result<_>>()?;
                Ok(Response::columns(columns))
            }
            Operation::Ping => {
                self.conn.ping().await.map_err(classify)?;
                Ok(Response::count(0))
            }
        }
    }

    async fn close(self: Box<Self>) -> Result<()> {
        self.conn.disconnect().await.map_err(classify)
    }
}
