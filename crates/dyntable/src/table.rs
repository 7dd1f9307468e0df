use crate::{db::Session, record::trace_failure, Engine, Error, Result};

use dyntable_core::{
    schema::{ident, system, AppField, ColumnInfo},
    stmt::{ColumnDef, Name, Statement, Type},
};
use std::{collections::HashSet, future::Future};

impl Engine {
    /// Creates a managed table with the system columns and one nullable
    /// column per field.
    pub async fn create_table(&self, table: &str, fields: &[AppField]) -> Result<()> {
        let name = Name::parse(table)?;

        let mut seen = HashSet::new();
        for field in fields {
            field.validate()?;
            if !seen.insert(field.field_code.as_str()) {
                return Err(Error::conflict(format!(
                    "duplicate field code `{}`",
                    field.field_code
                )));
            }
        }

        let mut columns = vec![
            ColumnDef::serial_primary_key(system::ID),
            ColumnDef::not_null(system::CREATED_BY, Type::BigInt),
            ColumnDef::not_null(system::CREATED_AT, Type::Timestamp),
            ColumnDef::not_null(system::UPDATED_AT, Type::Timestamp),
        ];
        columns.extend(fields.iter().map(field_column));

        self.ddl("create_table", Statement::create_table(name, columns))
            .await
    }

    pub async fn drop_table(&self, table: &str) -> Result<()> {
        let name = Name::parse(table)?;
        self.ddl("drop_table", Statement::drop_table(name)).await
    }

    pub async fn drop_table_if_exists(&self, table: &str) -> Result<()> {
        let name = Name::parse(table)?;
        self.ddl("drop_table", Statement::drop_table_if_exists(name))
            .await
    }

    /// Adds the column of `field`. The column is always nullable, so existing
    /// rows are kept.
    pub async fn add_column(&self, table: &str, field: &AppField) -> Result<()> {
        let name = Name::parse(table)?;
        field.validate()?;
        self.ddl("add_column", Statement::add_column(name, field_column(field)))
            .await
    }

    /// Drops a field column by its physical name. System columns cannot be
    /// dropped.
    pub async fn drop_column(&self, table: &str, column: &str) -> Result<()> {
        let name = Name::parse(table)?;
        ident::validate_identifier("column name", column)?;

        if system::is_system_column(column) {
            return Err(Error::validation(format!(
                "`{column}` is a system column and cannot be dropped"
            )));
        }

        self.ddl("drop_column", Statement::drop_column(name, column))
            .await
    }

    /// Physical column name of `field` in a managed table.
    pub fn column_name(&self, field: &AppField) -> String {
        field.column_name()
    }

    /// Columns of a managed table as the database reports them.
    pub async fn list_columns(&self, table: &str) -> Result<Vec<ColumnInfo>> {
        let name = Name::parse(table)?;
        self.session().await?.list_columns(&name).await
    }

    /// Adds the column of `field`, then runs `persist`, typically the write
    /// of the field metadata. If `persist` fails the column is dropped again
    /// and the error returned.
    pub async fn add_field_with<T, F>(&self, table: &str, field: &AppField, persist: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        self.add_column(table, field).await?;

        match persist.await {
            Ok(value) => Ok(value),
            Err(err) => {
                if let Err(undo) = self.drop_column(table, &field.column_name()).await {
                    tracing::error!(
                        table,
                        field = %field.field_code,
                        error = %undo,
                        "failed to drop column after field persistence failed"
                    );
                }
                Err(err)
            }
        }
    }

    /// Drops the column of `field`, then runs `remove`, typically the delete
    /// of the field metadata. `remove` only runs once the column is gone.
    pub async fn drop_field_with<T, F>(&self, table: &str, field: &AppField, remove: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        self.drop_column(table, &field.column_name()).await?;
        remove.await
    }

    /// Runs one DDL statement, inside a transaction where DDL is
    /// transactional.
    async fn ddl(&self, operation: &'static str, stmt: Statement) -> Result<()> {
        let table = stmt.table().to_string();
        let mut session = self.session().await?;

        let res = run_ddl(&mut session, stmt).await;
        match &res {
            Ok(()) => tracing::debug!(operation, table = %table, "ddl applied"),
            Err(err) => trace_failure(operation, &table, err),
        }
        res
    }
}

async fn run_ddl(session: &mut Session, stmt: Statement) -> Result<()> {
    if !session.capability()?.transactional_ddl {
        session.execute(stmt).await?;
        return Ok(());
    }

    session.begin(false).await?;
    let res = session.execute(stmt).await.map(|_| ());
    session.finish(res).await
}

fn field_column(field: &AppField) -> ColumnDef {
    ColumnDef::nullable(field.column_name(), field.field_type.storage_type())
}
