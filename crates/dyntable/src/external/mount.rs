use super::{Connector, DataSource};
use crate::{
    AppField, ChartDataRequest, ChartDataResponse, ColumnInfo, RecordQueryOptions,
    RecordResponse, RecordSource, Result, TableInfo, Value,
};

use dyntable_core::async_trait;
use std::fmt;

/// A data source paired with its decrypted password, usable wherever a
/// [`RecordSource`] is expected.
#[derive(Clone)]
pub struct Mount {
    connector: Connector,
    source: DataSource,
    password: String,
}

impl Mount {
    /// Decrypts the stored password with the process-wide key.
    pub fn new(connector: Connector, source: DataSource) -> Result<Mount> {
        let password = source.decrypt_password()?;
        Ok(Mount::with_password(connector, source, password))
    }

    pub fn with_password(
        connector: Connector,
        source: DataSource,
        password: impl Into<String>,
    ) -> Mount {
        Mount {
            connector,
            source,
            password: password.into(),
        }
    }

    pub fn source(&self) -> &DataSource {
        &self.source
    }

    pub async fn test_connection(&self) -> Result<()> {
        self.connector
            .test_connection(&self.source, &self.password)
            .await
    }

    pub async fn get_tables(&self) -> Result<Vec<TableInfo>> {
        self.connector.get_tables(&self.source, &self.password).await
    }

    pub async fn get_columns(&self, table: &str) -> Result<Vec<ColumnInfo>> {
        self.connector
            .get_columns(&self.source, &self.password, table)
            .await
    }
}

impl fmt::Debug for Mount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mount")
            .field("connector", &self.connector)
            .field("source", &self.source.name)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[async_trait]
impl RecordSource for Mount {
    async fn get_records(
        &self,
        table: &str,
        fields: &[AppField],
        opts: &RecordQueryOptions,
    ) -> Result<(Vec<RecordResponse>, u64)> {
        self.connector
            .get_records(&self.source, &self.password, table, fields, opts)
            .await
    }

    async fn get_record_by_id(
        &self,
        table: &str,
        fields: &[AppField],
        id: Value,
    ) -> Result<RecordResponse> {
        self.connector
            .get_record_by_id(&self.source, &self.password, table, fields, id)
            .await
    }

    async fn get_aggregated_data(
        &self,
        table: &str,
        fields: &[AppField],
        req: &ChartDataRequest,
    ) -> Result<ChartDataResponse> {
        self.connector
            .get_aggregated_data(&self.source, &self.password, table, fields, req)
            .await
    }

    async fn count_records(&self, table: &str) -> Result<u64> {
        self.connector
            .count_records(&self.source, &self.password, table)
            .await
    }
}
