use super::PoolConnection;
use crate::Result;

use dyntable_core::{
    driver::{
        operation::{ListColumns, Transaction},
        Capability, Connection, Operation,
    },
    schema::{ColumnInfo, TableInfo},
    stmt::{Name, Statement, Value, ValueRecord},
    Error,
};
use std::time::Duration;

pub(crate) enum Handle {
    Pooled(PoolConnection),
    Owned(Box<dyn Connection>),
}

impl Handle {
    fn connection(&mut self) -> &mut dyn Connection {
        match self {
            Handle::Pooled(conn) => &mut **conn,
            Handle::Owned(conn) => &mut **conn,
        }
    }
}

/// One connection used for the duration of a single engine call.
///
/// Every operation is bounded by the statement timeout. A session that is
/// dropped while a transaction is open, or whose statement timed out, never
/// hands its connection back to the pool.
pub(crate) struct Session {
    handle: Option<Handle>,
    timeout: Duration,
    in_transaction: bool,
    poisoned: bool,
}

impl Session {
    pub(crate) fn new(handle: Handle, timeout: Duration) -> Session {
        Session {
            handle: Some(handle),
            timeout,
            in_transaction: false,
            poisoned: false,
        }
    }

    pub(crate) fn capability(&self) -> Result<&'static Capability> {
        match &self.handle {
            Some(Handle::Pooled(conn)) => Ok(conn.capability()),
            Some(Handle::Owned(conn)) => Ok(conn.capability()),
            None => Err(dyntable_core::err!("session is closed")),
        }
    }

    pub(crate) async fn exec(&mut self, op: Operation) -> Result<dyntable_core::driver::Response> {
        let timeout = self.timeout;
        let Some(handle) = self.handle.as_mut() else {
            return Err(dyntable_core::err!("session is closed"));
        };

        match tokio::time::timeout(timeout, handle.connection().exec(op)).await {
            Ok(res) => res,
            Err(_) => {
                self.poisoned = true;
                Err(Error::timed_out("statement", timeout))
            }
        }
    }

    /// Runs a statement that produces rows.
    pub(crate) async fn query(&mut self, stmt: impl Into<Statement>) -> Result<Vec<ValueRecord>> {
        let stmt = stmt.into();
        tracing::trace!(table = %stmt.table(), "query");
        self.exec(stmt.into()).await?.rows.into_values()
    }

    /// Runs a statement and returns the number of affected rows.
    pub(crate) async fn execute(&mut self, stmt: impl Into<Statement>) -> Result<u64> {
        let stmt = stmt.into();
        tracing::trace!(table = %stmt.table(), "execute");
        self.exec(stmt.into()).await?.rows.into_count()
    }

    /// Runs a single-value query such as `SELECT COUNT(*)`.
    pub(crate) async fn count(&mut self, stmt: impl Into<Statement>) -> Result<u64> {
        let rows = self.query(stmt).await?;
        let value = rows
            .into_iter()
            .next()
            .and_then(|row| row.fields.into_iter().next())
            .unwrap_or(Value::I64(0));

        value
            .as_i64()
            .or_else(|| value.as_f64().map(|n| n as i64))
            .map(|n| n.max(0) as u64)
            .ok_or_else(|| dyntable_core::err!("count returned a {}", value.type_name()))
    }

    pub(crate) async fn list_tables(&mut self) -> Result<Vec<TableInfo>> {
        self.exec(Operation::ListTables).await?.rows.into_tables()
    }

    pub(crate) async fn list_columns(&mut self, table: &Name) -> Result<Vec<ColumnInfo>> {
        let columns = self
            .exec(
                ListColumns {
                    table: table.clone(),
                }
                .into(),
            )
            .await?
            .rows
            .into_columns()?;

        if columns.is_empty() {
            return Err(Error::not_found(
                dyntable_core::Resource::Table,
                table.to_string(),
            ));
        }

        Ok(columns)
    }

    pub(crate) async fn ping(&mut self) -> Result<()> {
        self.exec(Operation::Ping).await?;
        Ok(())
    }

    pub(crate) async fn begin(&mut self, read_only: bool) -> Result<()> {
        let op = if read_only {
            Transaction::start_read_only()
        } else {
            Transaction::start()
        };
        self.exec(op.into()).await?;
        self.in_transaction = true;
        Ok(())
    }

    pub(crate) async fn commit(&mut self) -> Result<()> {
        self.exec(Transaction::Commit.into()).await?;
        self.in_transaction = false;
        Ok(())
    }

    pub(crate) async fn rollback(&mut self) -> Result<()> {
        self.exec(Transaction::Rollback.into()).await?;
        self.in_transaction = false;
        Ok(())
    }

    /// Ends the open transaction according to `res`: commit on success,
    /// rollback on failure. The original error wins over a failed rollback.
    pub(crate) async fn finish<T>(&mut self, res: Result<T>) -> Result<T> {
        if !self.in_transaction {
            return res;
        }

        match res {
            Ok(value) => {
                if let Err(err) = self.commit().await {
                    self.poisoned = true;
                    return Err(err);
                }
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = self.rollback().await {
                    tracing::error!(error = %rollback_err, "rollback failed");
                    self.poisoned = true;
                }
                Err(err)
            }
        }
    }

    /// Closes an owned connection, waiting for the server where the protocol
    /// has a goodbye. Pooled connections go back to the pool instead.
    pub(crate) async fn close(mut self) -> Result<()> {
        match self.handle.take() {
            Some(Handle::Owned(conn)) => conn.close().await,
            Some(handle @ Handle::Pooled(_)) => {
                self.handle = Some(handle);
                Ok(())
            }
            None => Ok(()),
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if !(self.poisoned || self.in_transaction) {
            return;
        }

        if let Some(Handle::Pooled(conn)) = self.handle.take() {
            tracing::debug!("discarding connection in unknown state");
            conn.discard();
        }
    }
}
