mod response;
pub use response::{Pagination, Record, RecordListResponse, RecordResponse};

use crate::{query::Planner, Engine, Error, RecordQueryOptions, Result};

use chrono::{Days, NaiveDate, NaiveTime};
use dyntable_core::{
    schema::{system, AppField},
    stmt::{Assignment, BinaryOp, Expr, Insert, Name, Query, Statement, Update, Value},
};

impl Engine {
    /// Inserts one record and returns its id.
    pub async fn insert_record(
        &self,
        table: &str,
        fields: &[AppField],
        data: Record,
        user_id: i64,
    ) -> Result<i64> {
        let ids = self.insert_records(table, fields, vec![data], user_id).await?;
        ids.into_iter()
            .next()
            .ok_or_else(|| dyntable_core::err!("insert into `{table}` returned no id"))
    }

    /// Inserts records atomically, returning their ids in input order.
    ///
    /// Every field not present in a record is written as null; required
    /// fields must be present. Keys that are not field codes are rejected.
    pub async fn insert_records(
        &self,
        table: &str,
        fields: &[AppField],
        records: Vec<Record>,
        user_id: i64,
    ) -> Result<Vec<i64>> {
        if records.is_empty() {
            return Ok(vec![]);
        }

        let name = Name::parse(table)?;
        let planner = Planner::managed(fields)?;
        let now = Value::Timestamp(self.now());

        let mut columns = vec![
            system::CREATED_BY.to_string(),
            system::CREATED_AT.to_string(),
            system::UPDATED_AT.to_string(),
        ];
        columns.extend(fields.iter().map(|field| planner.column(field)));

        let rows = records
            .into_iter()
            .map(|record| {
                let mut row = vec![Value::I64(user_id), now.clone(), now.clone()];
                row.extend(insert_values(&planner, record)?);
                Ok(row)
            })
            .collect::<Result<Vec<_>>>()?;

        let expected = rows.len();
        let stmt = Insert {
            table: name,
            columns,
            rows,
            returning: Some(system::ID.to_string()),
        };

        let mut session = self.session().await?;
        session.begin(false).await?;

        let res: Result<Vec<i64>> = async {
            let rows = session.query(stmt).await?;

            let ids = rows
                .into_iter()
                .map(|row| {
                    row.first()
                        .and_then(Value::as_i64)
                        .ok_or_else(|| dyntable_core::err!("insert returned a non-integer id"))
                })
                .collect::<Result<Vec<_>>>()?;

            if ids.len() != expected {
                return Err(dyntable_core::err!(
                    "inserted {expected} records but got {} ids",
                    ids.len()
                ));
            }

            Ok(ids)
        }
        .await;

        let res = session.finish(res).await;
        match &res {
            Ok(ids) => tracing::debug!(table, count = ids.len(), "inserted records"),
            Err(err) => trace_failure("insert_records", table, err),
        }
        res
    }

    /// Updates the fields present in `data` and bumps `updated_at`.
    pub async fn update_record(
        &self,
        table: &str,
        fields: &[AppField],
        id: i64,
        data: Record,
    ) -> Result<()> {
        let name = Name::parse(table)?;
        let planner = Planner::managed(fields)?;
        check_keys(&planner, &data)?;

        let mut assignments = vec![Assignment {
            column: system::UPDATED_AT.to_string(),
            value: Value::Timestamp(self.now()),
        }];

        for (code, value) in data {
            let field = planner.field(&code)?;
            assignments.push(Assignment {
                column: planner.column(field),
                value: field.coerce_write(value)?,
            });
        }

        let stmt = Update {
            table: name,
            assignments,
            filter: Some(Expr::eq(Expr::column(system::ID), Value::I64(id))),
        };

        let mut session = self.session().await?;
        session.begin(false).await?;

        let res: Result<()> = async {
            match session.execute(stmt).await? {
                0 => Err(Error::record_not_found(format!("table={table} id={id}"))),
                _ => Ok(()),
            }
        }
        .await;

        let res = session.finish(res).await;
        if let Err(err) = &res {
            trace_failure("update_record", table, err);
        }
        res
    }

    pub async fn delete_record(&self, table: &str, id: i64) -> Result<()> {
        match self.delete_records(table, &[id]).await {
            Ok(_) => Ok(()),
            Err(err) if err.is_record_not_found() => Err(Error::record_not_found(format!(
                "table={table} id={id}"
            ))),
            Err(err) => Err(err),
        }
    }

    /// Deletes records atomically. Fails with record-not-found, deleting
    /// nothing, if any id does not exist.
    pub async fn delete_records(&self, table: &str, ids: &[i64]) -> Result<u64> {
        let name = Name::parse(table)?;

        let mut ids = ids.to_vec();
        ids.sort_unstable();
        ids.dedup();

        if ids.is_empty() {
            return Ok(0);
        }

        let expected = ids.len() as u64;
        let stmt = Statement::delete(
            name,
            Expr::in_list(
                Expr::column(system::ID),
                ids.into_iter().map(Value::I64).collect(),
            ),
        );

        let mut session = self.session().await?;
        session.begin(false).await?;

        let res: Result<u64> = async {
            let deleted = session.execute(stmt).await?;
            if deleted != expected {
                return Err(Error::record_not_found(format!(
                    "table={table}; {} of {expected} ids not found",
                    expected - deleted.min(expected)
                )));
            }
            Ok(deleted)
        }
        .await;

        let res = session.finish(res).await;
        if let Err(err) = &res {
            trace_failure("delete_records", table, err);
        }
        res
    }

    /// One page of records plus the number of records matching the filters.
    pub async fn get_records(
        &self,
        table: &str,
        fields: &[AppField],
        opts: &RecordQueryOptions,
    ) -> Result<(Vec<RecordResponse>, u64)> {
        let name = Name::parse(table)?;
        let planner = Planner::managed(fields)?;
        let select = planner.select(&name, opts)?;
        let count = planner.count(&name, opts)?;

        let mut session = self.session().await?;

        let res: Result<(Vec<RecordResponse>, u64)> = async {
            let rows = session.query(select).await?;
            let total = session.count(count).await?;
            let records = rows.into_iter().map(|row| planner.decode(row)).collect();
            Ok((records, total))
        }
        .await;

        if let Err(err) = &res {
            trace_failure("get_records", table, err);
        }
        res
    }

    pub async fn get_record_by_id(
        &self,
        table: &str,
        fields: &[AppField],
        id: i64,
    ) -> Result<RecordResponse> {
        let name = Name::parse(table)?;
        let planner = Planner::managed(fields)?;
        let query = planner.select_by_key(&name, Value::I64(id))?;

        let rows = self.session().await?.query(query).await.inspect_err(|err| {
            trace_failure("get_record_by_id", table, err);
        })?;

        rows.into_iter()
            .next()
            .map(|row| planner.decode(row))
            .ok_or_else(|| Error::record_not_found(format!("table={table} id={id}")))
    }

    pub async fn count_records(&self, table: &str) -> Result<u64> {
        let name = Name::parse(table)?;
        self.session()
            .await?
            .count(Query::count(name, None))
            .await
            .inspect_err(|err| trace_failure("count_records", table, err))
    }

    /// Records updated since midnight in the reference timezone.
    pub async fn count_todays_updates(&self, table: &str) -> Result<u64> {
        self.count_updates_on(table, self.today()).await
    }

    /// Records whose `updated_at` falls in `[date 00:00, date+1 00:00)`.
    pub async fn count_updates_on(&self, table: &str, date: NaiveDate) -> Result<u64> {
        let name = Name::parse(table)?;

        let start = date.and_time(NaiveTime::MIN);
        let end = date
            .checked_add_days(Days::new(1))
            .ok_or_else(|| Error::validation(format!("date {date} is out of range")))?
            .and_time(NaiveTime::MIN);

        let filter = Expr::And(vec![
            Expr::binary_op(
                Expr::column(system::UPDATED_AT),
                BinaryOp::Ge,
                Value::Timestamp(start),
            ),
            Expr::binary_op(
                Expr::column(system::UPDATED_AT),
                BinaryOp::Lt,
                Value::Timestamp(end),
            ),
        ]);

        self.session()
            .await?
            .count(Query::count(name, Some(filter)))
            .await
            .inspect_err(|err| trace_failure("count_updates_on", table, err))
    }
}

/// Rejects keys that are not field codes.
fn check_keys(planner: &Planner<'_>, data: &Record) -> Result<()> {
    for code in data.keys() {
        planner.field(code)?;
    }
    Ok(())
}

/// Values of every field, in field order, for an insert.
fn insert_values(planner: &Planner<'_>, mut data: Record) -> Result<Vec<Value>> {
    check_keys(planner, &data)?;

    planner
        .fields()
        .iter()
        .map(|field| match data.swap_remove(&field.field_code) {
            Some(value) => field.coerce_write(value),
            None if field.constraints.required => Err(field.missing()),
            None => Ok(Value::Null),
        })
        .collect()
}

/// Logs failures the caller cannot correct. Caller errors are left to the
/// caller.
pub(crate) fn trace_failure(operation: &'static str, table: &str, err: &Error) {
    if err.is_validation() || err.is_not_found() || err.is_conflict() || err.is_read_only() {
        tracing::debug!(operation, table, error = %err, "rejected");
    } else {
        tracing::error!(operation, table, error = %err, "failed");
    }
}
