//! Grouped statistics for charts.
//!
//! Grouping happens in SQL: one row per distinct, non-null x-axis value,
//! ordered ascending by that value in the column's natural order.

use crate::{query::Planner, record::trace_failure, Engine, Error, FilterItem, Result};

use dyntable_core::{
    schema::AppField,
    stmt::{Direction, Expr, ExprFunc, Name, OrderByExpr, Query, ValueRecord},
};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartDataRequest {
    /// Presentation hint passed through by the caller; it does not change
    /// the computation.
    #[serde(default)]
    pub chart_type: String,

    pub x_axis: XAxis,

    #[serde(default)]
    pub y_axis: YAxis,

    #[serde(default)]
    pub filters: Vec<FilterItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XAxis {
    pub field: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct YAxis {
    /// Required unless the aggregation is `count`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,

    #[serde(default)]
    pub aggregation: Aggregation,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregation {
    #[default]
    Count,
    Sum,
    Avg,
    Min,
    Max,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartDataResponse {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub label: String,

    /// One value per label.
    pub data: Vec<f64>,
}

impl ChartDataRequest {
    /// `count` of records grouped by `x_field`.
    pub fn count(x_field: impl Into<String>) -> ChartDataRequest {
        ChartDataRequest {
            chart_type: String::new(),
            x_axis: XAxis {
                field: x_field.into(),
            },
            y_axis: YAxis::default(),
            filters: vec![],
        }
    }

    /// `aggregation` of `y_field` grouped by `x_field`.
    pub fn new(
        x_field: impl Into<String>,
        aggregation: Aggregation,
        y_field: impl Into<String>,
    ) -> ChartDataRequest {
        ChartDataRequest {
            y_axis: YAxis {
                field: Some(y_field.into()),
                aggregation,
            },
            ..ChartDataRequest::count(x_field)
        }
    }

    pub fn filter(mut self, filter: FilterItem) -> Self {
        self.filters.push(filter);
        self
    }
}

impl Aggregation {
    pub fn as_str(self) -> &'static str {
        match self {
            Aggregation::Count => "count",
            Aggregation::Sum => "sum",
            Aggregation::Avg => "avg",
            Aggregation::Min => "min",
            Aggregation::Max => "max",
        }
    }

    fn title(self) -> &'static str {
        match self {
            Aggregation::Count => "Count",
            Aggregation::Sum => "Sum",
            Aggregation::Avg => "Average",
            Aggregation::Min => "Min",
            Aggregation::Max => "Max",
        }
    }
}

impl fmt::Display for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated aggregation ready to run.
pub(crate) struct Plan<'a> {
    pub(crate) query: Query,
    x_field: &'a AppField,
    label: String,
}

impl<'a> Plan<'a> {
    pub(crate) fn new(
        planner: &Planner<'a>,
        table: &Name,
        req: &ChartDataRequest,
    ) -> Result<Plan<'a>> {
        if req.x_axis.field.trim().is_empty() {
            return Err(Error::validation("x axis field is required"));
        }

        let x_field = planner.field(&req.x_axis.field)?;
        let x_column = Expr::column(planner.column(x_field));
        let aggregation = req.y_axis.aggregation;

        let (func, label) = match aggregation {
            Aggregation::Count => (ExprFunc::Count(None), "Count".to_string()),
            _ => {
                let Some(y_code) = req.y_axis.field.as_deref().filter(|s| !s.is_empty()) else {
                    return Err(Error::validation(format!(
                        "aggregation `{aggregation}` needs a y axis field"
                    )));
                };

                let y_field = planner.field(y_code)?;
                if !y_field.field_type.is_numeric() {
                    return Err(Error::validation(format!(
                        "aggregation `{aggregation}` needs a number field; `{y_code}` is {}",
                        y_field.field_type
                    )));
                }

                let y_column = Box::new(Expr::column(planner.column(y_field)));
                let func = match aggregation {
                    Aggregation::Sum => ExprFunc::Sum(y_column),
                    Aggregation::Avg => ExprFunc::Avg(y_column),
                    Aggregation::Min => ExprFunc::Min(y_column),
                    _ => ExprFunc::Max(y_column),
                };

                (
                    func,
                    format!("{} of {}", aggregation.title(), y_field.field_name),
                )
            }
        };

        let mut predicates = vec![];
        if let Some(filter) = planner.filter(&req.filters)? {
            predicates.push(filter);
        }
        predicates.push(Expr::is_null(x_column.clone(), true));

        let query = Query {
            filter: Expr::and_all(predicates),
            group_by: vec![x_column.clone()],
            order_by: vec![OrderByExpr::new(x_column.clone(), Direction::Asc)],
            ..Query::new(table.clone(), vec![x_column, Expr::Func(func)])
        };

        Ok(Plan {
            query,
            x_field,
            label,
        })
    }

    /// Shapes grouped rows into a chart response. A null aggregate, which
    /// happens when every y value of a group is null, is reported as `0`.
    pub(crate) fn collect(self, rows: Vec<ValueRecord>) -> ChartDataResponse {
        let mut labels = Vec::with_capacity(rows.len());
        let mut data = Vec::with_capacity(rows.len());

        for row in rows {
            let mut values = row.into_iter();
            let x = values.next().unwrap_or_default();
            let y = values.next().unwrap_or_default();

            labels.push(self.x_field.field_type.coerce_stored(x).to_label());
            data.push(y.as_f64().unwrap_or(0.0));
        }

        ChartDataResponse {
            labels,
            datasets: vec![Dataset {
                label: self.label,
                data,
            }],
        }
    }
}

impl Engine {
    pub async fn get_aggregated_data(
        &self,
        table: &str,
        fields: &[AppField],
        req: &ChartDataRequest,
    ) -> Result<ChartDataResponse> {
        let name = Name::parse(table)?;
        let planner = Planner::managed(fields)?;
        let plan = Plan::new(&planner, &name, req)?;

        let rows = self
            .session()
            .await?
            .query(plan.query.clone())
            .await
            .inspect_err(|err| trace_failure("get_aggregated_data", table, err))?;

        Ok(plan.collect(rows))
    }
}
