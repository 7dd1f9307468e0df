use crate::{
    AppField, ChartDataRequest, ChartDataResponse, Engine, Error, RecordQueryOptions,
    RecordResponse, Result, Value,
};

use dyntable_core::async_trait;

/// The read and aggregate surface shared by managed tables ([`Engine`]) and
/// external data sources ([`Mount`](crate::Mount)).
///
/// Callers pick the implementation by whether the application is backed by a
/// data source.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// One page of records plus the number of records matching the filters.
    async fn get_records(
        &self,
        table: &str,
        fields: &[AppField],
        opts: &RecordQueryOptions,
    ) -> Result<(Vec<RecordResponse>, u64)>;

    async fn get_record_by_id(
        &self,
        table: &str,
        fields: &[AppField],
        id: Value,
    ) -> Result<RecordResponse>;

    async fn get_aggregated_data(
        &self,
        table: &str,
        fields: &[AppField],
        req: &ChartDataRequest,
    ) -> Result<ChartDataResponse>;

    async fn count_records(&self, table: &str) -> Result<u64>;
}

#[async_trait]
impl RecordSource for Engine {
    async fn get_records(
        &self,
        table: &str,
        fields: &[AppField],
        opts: &RecordQueryOptions,
    ) -> Result<(Vec<RecordResponse>, u64)> {
        Engine::get_records(self, table, fields, opts).await
    }

    async fn get_record_by_id(
        &self,
        table: &str,
        fields: &[AppField],
        id: Value,
    ) -> Result<RecordResponse> {
        let parsed = id
            .as_i64()
            .or_else(|| id.as_str().and_then(|s| s.trim().parse().ok()));

        let Some(id) = parsed else {
            return Err(Error::validation(format!(
                "record id must be an integer, got {}",
                id.type_name()
            )));
        };

        Engine::get_record_by_id(self, table, fields, id).await
    }

    async fn get_aggregated_data(
        &self,
        table: &str,
        fields: &[AppField],
        req: &ChartDataRequest,
    ) -> Result<ChartDataResponse> {
        Engine::get_aggregated_data(self, table, fields, req).await
    }

    async fn count_records(&self, table: &str) -> Result<u64> {
        Engine::count_records(self, table).await
    }
}
