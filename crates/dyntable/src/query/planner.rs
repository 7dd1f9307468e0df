use super::{filter, FilterItem, RecordQueryOptions};
use crate::{record::RecordResponse, Error, Record, Result};

use dyntable_core::{
    schema::{ident, system, AppField, FieldType},
    stmt::{Direction, Expr, Name, OrderByExpr, Query, Value, ValueRecord},
};

/// How fields map onto the physical columns of a table.
#[derive(Debug, Clone)]
pub(crate) enum Layout {
    /// A table created by the engine: prefixed field columns plus the system
    /// columns.
    Managed,

    /// A table in an external data source: field codes are column names and
    /// the primary key, if the table has a single-column one, identifies
    /// records.
    External { primary_key: Option<String> },
}

/// Turns query options into statements against one table, and rows back into
/// records, for a given live field list.
#[derive(Debug)]
pub(crate) struct Planner<'a> {
    fields: &'a [AppField],
    layout: Layout,
}

impl<'a> Planner<'a> {
    pub(crate) fn new(fields: &'a [AppField], layout: Layout) -> Result<Planner<'a>> {
        for field in fields {
            match layout {
                Layout::Managed => ident::validate_field_code(&field.field_code)?,
                Layout::External { .. } => {
                    ident::validate_identifier("column name", &field.field_code)?
                }
            }
        }

        Ok(Planner { fields, layout })
    }

    pub(crate) fn managed(fields: &'a [AppField]) -> Result<Planner<'a>> {
        Planner::new(fields, Layout::Managed)
    }

    pub(crate) fn fields(&self) -> &'a [AppField] {
        self.fields
    }

    /// Resolves a field code against the live field list.
    pub(crate) fn field(&self, code: &str) -> Result<&'a AppField> {
        self.fields
            .iter()
            .find(|field| field.field_code == code)
            .ok_or_else(|| Error::validation(format!("unknown field `{code}`")))
    }

    pub(crate) fn column(&self, field: &AppField) -> String {
        match self.layout {
            Layout::Managed => field.column_name(),
            Layout::External { .. } => field.field_code.clone(),
        }
    }

    /// The identifying column, if the table has one.
    pub(crate) fn key_column(&self) -> Option<&str> {
        match &self.layout {
            Layout::Managed => Some(system::ID),
            Layout::External { primary_key } => primary_key.as_deref(),
        }
    }

    /// `WHERE` clause of the given filters, AND-ed together.
    pub(crate) fn filter(&self, filters: &[FilterItem]) -> Result<Option<Expr>> {
        let predicates = filters
            .iter()
            .map(|item| {
                let field = self.field(&item.field)?;
                filter::predicate(field, self.column(field), item)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Expr::and_all(predicates))
    }

    /// `ORDER BY` clause.
    ///
    /// A known field sorts in the requested direction, tie-broken by the key
    /// column. An empty or unknown sort key falls back to ascending key order.
    pub(crate) fn order_by(&self, sort: &str, order: Direction) -> Vec<OrderByExpr> {
        let key = self.key_column();

        let column = if let Some(field) = self.fields.iter().find(|f| f.field_code == sort) {
            Some(self.column(field))
        } else if Some(sort) == key
            || (matches!(self.layout, Layout::Managed) && system::SORTABLE.contains(&sort))
        {
            Some(sort.to_string())
        } else {
            if !sort.is_empty() {
                tracing::warn!(sort, "unknown sort key; falling back to key order");
            }
            None
        };

        let mut order_by = vec![];

        match column {
            Some(column) => {
                let is_key = Some(column.as_str()) == key;
                order_by.push(OrderByExpr::new(Expr::column(column), order));

                if let (false, Some(key)) = (is_key, key) {
                    order_by.push(OrderByExpr::new(Expr::column(key), Direction::Asc));
                }
            }
            None => {
                if let Some(key) = key {
                    order_by.push(OrderByExpr::new(Expr::column(key), Direction::Asc));
                }
            }
        }

        order_by
    }

    /// Selected columns, in the order [`Planner::decode`] reads them.
    pub(crate) fn projection(&self) -> Vec<Expr> {
        let mut returning: Vec<Expr> = match &self.layout {
            Layout::Managed => [
                system::ID,
                system::CREATED_BY,
                system::CREATED_AT,
                system::UPDATED_AT,
            ]
            .into_iter()
            .map(Expr::column)
            .collect(),
            Layout::External { primary_key } => primary_key
                .iter()
                .map(|column| Expr::column(column.as_str()))
                .collect::<Vec<_>>(),
        };

        returning.extend(self.fields.iter().map(|field| Expr::column(self.column(field))));
        returning
    }

    /// The page of records `opts` asks for.
    pub(crate) fn select(&self, table: &Name, opts: &RecordQueryOptions) -> Result<Query> {
        let projection = self.projection();
        if projection.is_empty() {
            return Err(Error::validation(format!(
                "no fields to select from `{table}`"
            )));
        }

        Ok(Query {
            filter: self.filter(&opts.filters)?,
            order_by: self.order_by(&opts.sort, opts.order),
            limit: Some(opts.to_limit()),
            ..Query::new(table.clone(), projection)
        })
    }

    /// Number of records matching the filters of `opts`, ignoring paging.
    pub(crate) fn count(&self, table: &Name, opts: &RecordQueryOptions) -> Result<Query> {
        Ok(Query::count(table.clone(), self.filter(&opts.filters)?))
    }

    /// A single record by key.
    pub(crate) fn select_by_key(&self, table: &Name, id: Value) -> Result<Query> {
        let Some(key) = self.key_column() else {
            return Err(Error::validation(format!(
                "table `{table}` has no single-column primary key"
            )));
        };

        Ok(Query {
            filter: Some(Expr::eq(Expr::column(key), id)),
            limit: Some(dyntable_core::stmt::Limit {
                limit: 1,
                offset: None,
            }),
            ..Query::new(table.clone(), self.projection())
        })
    }

    /// Maps a row selected with [`Planner::projection`] to a record.
    pub(crate) fn decode(&self, row: ValueRecord) -> RecordResponse {
        let mut values = row.into_iter();
        let mut next = || values.next().unwrap_or_default();

        let mut record = match &self.layout {
            Layout::Managed => RecordResponse {
                id: next(),
                data: Record::new(),
                created_by: next().as_i64(),
                created_at: timestamp(next()),
                updated_at: timestamp(next()),
            },
            Layout::External { primary_key } => RecordResponse {
                id: match primary_key {
                    Some(_) => next(),
                    None => Value::Null,
                },
                ..RecordResponse::default()
            },
        };

        if let Value::F64(_) = record.id {
            if let Some(id) = record.id.as_i64() {
                record.id = Value::I64(id);
            }
        }

        for field in self.fields {
            let value = field.field_type.coerce_stored(next());
            record.data.insert(field.field_code.clone(), value);
        }

        record
    }
}

fn timestamp(value: Value) -> Option<chrono::NaiveDateTime> {
    match FieldType::Datetime.coerce_stored(value) {
        Value::Timestamp(ts) => Some(ts),
        _ => None,
    }
}
