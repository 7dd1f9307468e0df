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
    stmt::ValueRecord,
    Result,
};
use dyntable_sql::{introspect, Serializer};
use postgres::types::ToSql;
use tokio_postgres::{Client, Config, NoTls};
use url::Url;

#[derive(Debug, Clone)]
pub struct PostgreSQL {
    config: Config,
}

impl PostgreSQL {
    /// Create a PostgreSQL driver from a `postgresql://` connection URL.
    pub fn new(url: &str) -> Result<Self> {
        let parsed = Url::parse(url).map_err(|err| {
            dyntable_core::Error::invalid_connection_url(format!("invalid PostgreSQL URL: {err}"))
        })?;

        if !matches!(parsed.scheme(), "postgresql" | "postgres") {
            return Err(dyntable_core::Error::invalid_connection_url(format!(
                "connection URL does not have a `postgresql` scheme; scheme={}",
                parsed.scheme()
            )));
        }

        if parsed.host_str().is_none() {
            return Err(dyntable_core::Error::invalid_connection_url(
                "missing host in connection URL",
            ));
        }

        if parsed.path().trim_start_matches('/').is_empty() {
            return Err(dyntable_core::Error::invalid_connection_url(
                "no database specified - missing path in connection URL",
            ));
        }

        // tokio-postgres percent-decodes the credentials and database name.
        let config = url.parse::<Config>().map_err(|err| {
            dyntable_core::Error::invalid_connection_url(format!("invalid PostgreSQL URL: {err}"))
        })?;

        Ok(Self::from_config(config))
    }

    /// Create a PostgreSQL driver from a prepared [`Config`].
    ///
    /// Use this when the password must not pass through a URL.
    pub fn from_config(config: Config) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Driver for PostgreSQL {
    fn capability(&self) -> &'static Capability {
        &Capability::POSTGRESQL
    }

    async fn connect(&self) -> Result<Box<dyn dyntable_core::Connection>> {
        let (client, connection) = self
            .config
            .connect(NoTls)
            .await
            .map_err(classify_connect)?;

        tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!(error = %e, "postgresql connection error");
            }
        });

        Ok(Box::new(Connection::new(client)))
    }
}

#[derive(Debug)]
pub struct Connection {
    client: Client,
}

impl Connection {
    /// Wrap an initialized client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    async fn query(
        &self,
        sql: &str,
        params: Vec<dyntable_core::stmt::Value>,
    ) -> Result<Vec<ValueRecord>> {
        let params = params.into_iter().map(Value::from).collect::<Vec<_>>();
        let args = params
            .iter()
            .map(|param| param as &(dyn ToSql + Sync))
            .collect::<Vec<_>>();

        let rows = self.client.query(sql, &args).await.map_err(classify)?;

        rows.iter()
            .map(|row| {
                let fields = row
                    .columns()
                    .iter()
                    .enumerate()
                    .map(|(index, column)| {
                        Value::from_sql(row, index, column)
                            .map(Value::into_inner)
                            .map_err(classify)
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(ValueRecord::from_vec(fields))
            })
            .collect()
    }

    async fn execute(&self, sql: &str, params: Vec<dyntable_core::stmt::Value>) -> Result<u64> {
        let params = params.into_iter().map(Value::from).collect::<Vec<_>>();
        let args = params
            .iter()
            .map(|param| param as &(dyn ToSql + Sync))
            .collect::<Vec<_>>();

        self.client.execute(sql, &args).await.map_err(classify)
    }
}

#[async_trait]
impl dyntable_core::driver::Connection for Connection {
    fn capability(&self) -> &'static Capability {
        &Capability::POSTGRESQL
    }

    async fn exec(&mut self, op: Operation) -> Result<Response> {
        let serializer = Serializer::postgresql();

        match op {
            Operation::QuerySql(op) => {
                let mut params = vec![];
                let sql = serializer.serialize(&op.stmt, &mut params)?;
                tracing::debug!(db.statement = %sql, "postgresql");

                if op.stmt.returns_rows() {
                    Ok(Response::values(self.query(&sql, params).await?))
                } else {
                    Ok(Response::count(self.execute(&sql, params).await?))
                }
            }
            Operation::Transaction(op) => {
                let sql = serializer.serialize_transaction(&op);
                tracing::trace!(db.statement = %sql, "postgresql");
                self.client.batch_execute(&sql).await.map_err(classify)?;
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
                self.client
                    .batch_execute(serializer.serialize_ping())
                    .await
                    .map_err(classify)?;
                Ok(Response::count(0))
            }
        }
    }
}
