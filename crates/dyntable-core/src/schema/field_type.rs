use crate::{
    stmt::{self, Value},
    Error, Result,
};

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// The type of a user-declared field.
///
/// The set is closed: parsing any other name is a validation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Textarea,
    Number,
    Date,
    Datetime,
    Boolean,
    Select,
    Email,
    Url,
}

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Timestamp layouts accepted from callers and from drivers that store
/// timestamps as text. Tried in order.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

impl FieldType {
    pub const ALL: [FieldType; 9] = [
        FieldType::Text,
        FieldType::Textarea,
        FieldType::Number,
        FieldType::Date,
        FieldType::Datetime,
        FieldType::Boolean,
        FieldType::Select,
        FieldType::Email,
        FieldType::Url,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Textarea => "textarea",
            FieldType::Number => "number",
            FieldType::Date => "date",
            FieldType::Datetime => "datetime",
            FieldType::Boolean => "boolean",
            FieldType::Select => "select",
            FieldType::Email => "email",
            FieldType::Url => "url",
        }
    }

    /// Physical column type. Total over the enum; the serializer renders it
    /// per dialect.
    pub fn storage_type(self) -> stmt::Type {
        match self {
            FieldType::Text | FieldType::Select | FieldType::Email | FieldType::Url => {
                stmt::Type::VarChar(255)
            }
            FieldType::Textarea => stmt::Type::Text,
            FieldType::Number => stmt::Type::Numeric,
            FieldType::Date => stmt::Type::Date,
            FieldType::Datetime => stmt::Type::Timestamp,
            FieldType::Boolean => stmt::Type::Boolean,
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, FieldType::Number)
    }

    /// String-valued types. Only these accept `like` filters and
    /// `max_length` constraints.
    pub fn is_textual(self) -> bool {
        matches!(
            self,
            FieldType::Text
                | FieldType::Textarea
                | FieldType::Select
                | FieldType::Email
                | FieldType::Url
        )
    }

    /// Types with a meaningful ordering for range operators.
    pub fn is_ordered(self) -> bool {
        !matches!(self, FieldType::Boolean)
    }

    /// Coerces a value supplied on write.
    ///
    /// Textual fields only accept strings here; everything else is parsed
    /// from its natural JSON shape or from a string.
    pub fn coerce_input(self, value: Value) -> Result<Value> {
        match value {
            Value::Null => Ok(Value::Null),
            Value::String(s) if self.is_textual() => Ok(Value::String(s)),
            value if self.is_textual() => Err(mismatch(self, value.type_name())),
            value => {
                let type_name = value.type_name();
                self.coerce_typed(value)
                    .ok_or_else(|| mismatch(self, type_name))
            }
        }
    }

    /// Coerces a filter operand. Textual fields accept any scalar and compare
    /// against its string form.
    pub fn coerce_filter(self, value: Value) -> Result<Value> {
        match value {
            Value::Null => Ok(Value::Null),
            value if self.is_textual() => Ok(Value::String(value.to_label())),
            value => {
                let type_name = value.type_name();
                self.coerce_typed(value)
                    .ok_or_else(|| mismatch(self, type_name))
            }
        }
    }

    /// Normalizes a value read back from a database into the field's
    /// canonical shape. Never fails: a value that cannot be interpreted is
    /// returned as is.
    pub fn coerce_stored(self, value: Value) -> Value {
        match (self, value) {
            (_, Value::Null) => Value::Null,
            (ty, Value::String(s)) if ty.is_textual() => Value::String(s),
            (ty, value) if ty.is_textual() => Value::String(value.to_label()),
            (FieldType::Number, value) => match value.as_f64() {
                Some(n) => normalize_number(n),
                None => value,
            },
            (_, value) => {
                let fallback = value.clone();
                self.coerce_typed(value).unwrap_or(fallback)
            }
        }
    }

    /// Shared parsing for the non-textual types.
    fn coerce_typed(self, value: Value) -> Option<Value> {
        match self {
            FieldType::Number => match value {
                Value::I64(n) => Some(Value::I64(n)),
                Value::F64(n) if n.is_finite() => Some(Value::F64(n)),
                Value::String(s) => parse_number(&s),
                _ => None,
            },
            FieldType::Boolean => match value {
                Value::Bool(b) => Some(Value::Bool(b)),
                Value::I64(0) => Some(Value::Bool(false)),
                Value::I64(1) => Some(Value::Bool(true)),
                Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                    "true" | "1" | "t" => Some(Value::Bool(true)),
                    "false" | "0" | "f" => Some(Value::Bool(false)),
                    _ => None,
                },
                _ => None,
            },
            FieldType::Date => match value {
                Value::Date(d) => Some(Value::Date(d)),
                Value::Timestamp(ts) => Some(Value::Date(ts.date())),
                Value::String(s) => parse_date(&s).map(Value::Date),
                _ => None,
            },
            FieldType::Datetime => match value {
                Value::Timestamp(ts) => Some(Value::Timestamp(ts)),
                Value::Date(d) => Some(Value::Timestamp(d.and_time(NaiveTime::MIN))),
                Value::String(s) => parse_timestamp(&s).map(Value::Timestamp),
                _ => None,
            },
            _ => None,
        }
    }
}

fn mismatch(ty: FieldType, got: &str) -> Error {
    Error::validation(format!("expected {} value, got {got}", ty.as_str()))
}

fn parse_number(s: &str) -> Option<Value> {
    let s = s.trim();
    if let Ok(n) = s.parse::<i64>() {
        return Some(Value::I64(n));
    }
    s.parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .map(Value::F64)
}

/// Integral numbers come back from `NUMERIC` columns as decimals or text;
/// present them as integers.
fn normalize_number(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < 9.0e15 {
        Value::I64(n as i64)
    } else {
        Value::F64(n)
    }
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .ok()
        .or_else(|| parse_timestamp(s).map(|ts| ts.date()))
}

/// Parses a timestamp. Inputs carrying an explicit offset (RFC 3339) are
/// normalized to UTC; naive inputs are taken as is. A bare date is midnight.
fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();

    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some(ts.naive_utc());
    }

    for format in TIMESTAMP_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(s, format) {
            return Some(ts);
        }
    }

    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN))
}

impl FromStr for FieldType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        FieldType::ALL
            .into_iter()
            .find(|ty| ty.as_str() == s)
            .ok_or_else(|| Error::validation(format!("unknown field type `{s}`")))
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
