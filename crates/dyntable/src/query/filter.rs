use crate::{Error, Result};

use dyntable_core::{
    schema::{AppField, FieldType},
    stmt::{BinaryOp, Expr, ExprInList, ExprLike, Value},
};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// One `field operator value` predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterItem {
    /// Field code.
    pub field: String,

    pub operator: Operator,

    /// Operand. A scalar for comparisons and `like`, an array (or a
    /// comma-separated string) for `in`/`not_in`, ignored by the null checks.
    #[serde(default)]
    pub value: serde_json::Value,
}

impl FilterItem {
    pub fn new(
        field: impl Into<String>,
        operator: Operator,
        value: impl Into<serde_json::Value>,
    ) -> FilterItem {
        FilterItem {
            field: field.into(),
            operator,
            value: value.into(),
        }
    }
}

/// The closed set of filter operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    /// Case-insensitive substring match. SQLite folds ASCII letters only.
    Like,
    NotLike,
    In,
    NotIn,
    IsNull,
    IsNotNull,
}

impl Operator {
    pub const ALL: [Operator; 12] = [
        Operator::Eq,
        Operator::Ne,
        Operator::Gt,
        Operator::Gte,
        Operator::Lt,
        Operator::Lte,
        Operator::Like,
        Operator::NotLike,
        Operator::In,
        Operator::NotIn,
        Operator::IsNull,
        Operator::IsNotNull,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Eq => "eq",
            Operator::Ne => "ne",
            Operator::Gt => "gt",
            Operator::Gte => "gte",
            Operator::Lt => "lt",
            Operator::Lte => "lte",
            Operator::Like => "like",
            Operator::NotLike => "not_like",
            Operator::In => "in",
            Operator::NotIn => "not_in",
            Operator::IsNull => "is_null",
            Operator::IsNotNull => "is_not_null",
        }
    }

    fn comparison(self) -> Option<BinaryOp> {
        match self {
            Operator::Eq => Some(BinaryOp::Eq),
            Operator::Ne => Some(BinaryOp::Ne),
            Operator::Gt => Some(BinaryOp::Gt),
            Operator::Gte => Some(BinaryOp::Ge),
            Operator::Lt => Some(BinaryOp::Lt),
            Operator::Lte => Some(BinaryOp::Le),
            _ => None,
        }
    }
}

impl FromStr for Operator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Operator> {
        Operator::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| Error::validation(format!("unknown filter operator `{s}`")))
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builds the predicate of `item` against `column`, the physical column of
/// `field`. Operands are coerced to the field type and always end up as bound
/// parameters.
pub(super) fn predicate(field: &AppField, column: String, item: &FilterItem) -> Result<Expr> {
    let ty = field.field_type;
    let op = item.operator;

    let invalid = |reason: &str| {
        Error::validation(format!(
            "filter on `{}`: operator `{op}` {reason}",
            field.field_code
        ))
    };

    match op {
        Operator::IsNull | Operator::IsNotNull => {
            Ok(Expr::is_null(Expr::column(column), op == Operator::IsNotNull))
        }
        Operator::Like | Operator::NotLike => {
            if !ty.is_textual() {
                return Err(invalid(&format!("does not apply to {ty} fields")));
            }

            let needle = match scalar(&item.value)? {
                Value::Null => return Err(invalid("needs a value")),
                value => value.to_label(),
            };

            Ok(Expr::Like(ExprLike {
                expr: Box::new(Expr::column(column)),
                pattern: format!("%{}%", escape_like(&needle)),
                negate: op == Operator::NotLike,
            }))
        }
        Operator::In | Operator::NotIn => {
            let list = list(&item.value)?
                .into_iter()
                .map(|value| coerce(ty, value))
                .collect::<Result<Vec<_>>>()
                .map_err(|err| err.context(format!("filter on `{}`", field.field_code)))?;

            if list.is_empty() {
                return Err(invalid("needs at least one value"));
            }

            Ok(Expr::InList(ExprInList {
                expr: Box::new(Expr::column(column)),
                list,
                negate: op == Operator::NotIn,
            }))
        }
        _ => {
            let Some(binary_op) = op.comparison() else {
                return Err(invalid("is not supported"));
            };

            if binary_op != BinaryOp::Eq && binary_op != BinaryOp::Ne && !ty.is_ordered() {
                return Err(invalid(&format!("does not apply to {ty} fields")));
            }

            let value = match scalar(&item.value)? {
                Value::Null => {
                    return Err(invalid("needs a value; use is_null to match nulls"));
                }
                value => coerce(ty, value)
                    .map_err(|err| err.context(format!("filter on `{}`", field.field_code)))?,
            };

            Ok(Expr::binary_op(Expr::column(column), binary_op, value))
        }
    }
}

fn coerce(ty: FieldType, value: Value) -> Result<Value> {
    match ty.coerce_filter(value)? {
        Value::Null => Err(Error::validation("null is not a valid operand")),
        value => Ok(value),
    }
}

/// Converts a JSON scalar operand.
fn scalar(value: &serde_json::Value) -> Result<Value> {
    match value {
        serde_json::Value::Null => Ok(Value::Null),
        serde_json::Value::Bool(b) => Ok(Value::Bool(*b)),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(n) => Ok(Value::I64(n)),
            None => n
                .as_f64()
                .map(Value::F64)
                .ok_or_else(|| Error::validation(format!("number `{n}` is out of range"))),
        },
        serde_json::Value::String(s) => Ok(Value::String(s.clone())),
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => Err(Error::validation(
            "filter value must be a string, number or boolean",
        )),
    }
}

/// Converts a list operand: an array of scalars or a comma-separated string.
fn list(value: &serde_json::Value) -> Result<Vec<Value>> {
    match value {
        serde_json::Value::Array(items) => items.iter().map(scalar).collect(),
        serde_json::Value::String(s) if s.trim().is_empty() => Ok(vec![]),
        serde_json::Value::String(s) => Ok(s
            .split(',')
            .map(|item| Value::String(item.trim().to_string()))
            .collect()),
        serde_json::Value::Null => Ok(vec![]),
        value => Ok(vec![scalar(value)?]),
    }
}

/// Escapes LIKE wildcards so user input matches literally.
fn escape_like(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
