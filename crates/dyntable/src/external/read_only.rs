use crate::{Error, Result};

use dyntable_core::{
    async_trait,
    driver::{operation::Transaction, Capability, Connection, Operation, Response},
};

/// A connection that only lets reads through.
///
/// Statements other than queries, and transactions not started read-only,
/// fail with a read-only error before reaching the database.
#[derive(Debug)]
pub struct ReadOnly {
    inner: Box<dyn Connection>,
}

impl ReadOnly {
    pub fn new(inner: Box<dyn Connection>) -> ReadOnly {
        ReadOnly { inner }
    }
}

#[async_trait]
impl Connection for ReadOnly {
    fn capability(&self) -> &'static Capability {
        self.inner.capability()
    }

    async fn exec(&mut self, op: Operation) -> Result<Response> {
        let permitted = match &op {
            Operation::Transaction(Transaction::Start { read_only }) => *read_only,
            op => op.is_read_only(),
        };

        if !permitted {
            // Statements carry bound values; log only what they are.
            match &op {
                Operation::QuerySql(query) => tracing::warn!(
                    statement = query.stmt.kind(),
                    table = %query.stmt.table(),
                    "refused write to external data source"
                ),
                _ => tracing::warn!("refused read-write transaction on external data source"),
            }
            return Err(Error::read_only("external data sources are read-only"));
        }

        self.inner.exec(op).await
    }

    async fn close(self: Box<Self>) -> Result<()> {
        self.inner.close().await
    }
}
