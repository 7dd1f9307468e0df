use chrono::{Datelike, NaiveDate, Timelike};
use dyntable_core::stmt::Value as CoreValue;
use mysql_async::{consts::ColumnType, prelude::ToValue, Column};

#[derive(Debug)]
pub struct Value(CoreValue);

impl From<CoreValue> for Value {
    fn from(value: CoreValue) -> Self {
        Self(value)
    }
}

impl Value {
    pub fn into_inner(self) -> CoreValue {
        self.0
    }

    /// Converts a MySQL value to a core value.
    ///
    /// The binary protocol sends `DECIMAL` and character columns as bytes and
    /// both `DATE` and `DATETIME` as a date tuple; the column type tells the
    /// latter two apart.
    pub fn from_sql(value: mysql_async::Value, column: &Column) -> Self {
        use mysql_async::Value as MyValue;

        let core_value = match value {
            MyValue::NULL => CoreValue::Null,
            MyValue::Int(v) => CoreValue::I64(v),
            MyValue::UInt(v) => match i64::try_from(v) {
                Ok(v) => CoreValue::I64(v),
                Err(_) => CoreValue::F64(v as f64),
            },
            MyValue::Float(v) => CoreValue::F64(v.into()),
            MyValue::Double(v) => CoreValue::F64(v),
            MyValue::Bytes(v) => CoreValue::String(String::from_utf8_lossy(&v).into_owned()),
            MyValue::Date(year, month, day, hour, minute, second, micros) => {
                match NaiveDate::from_ymd_opt(year.into(), month.into(), day.into()) {
                    Some(date) if column.column_type() == ColumnType::MYSQL_TYPE_DATE => {
                        CoreValue::Date(date)
                    }
                    Some(date) => date
                        .and_hms_micro_opt(hour.into(), minute.into(), second.into(), micros)
                        .map(CoreValue::Timestamp)
                        .unwrap_or_default(),
                    // Zero dates (`0000-00-00`) have no calendar value.
                    None => CoreValue::Null,
                }
            }
            MyValue::Time(negative, days, hours, minutes, seconds, micros) => {
                let sign = if negative { "-" } else { "" };
                let hours = u32::from(hours) + days * 24;
                CoreValue::String(format!(
                    "{sign}{hours:02}:{minutes:02}:{seconds:02}.{micros:06}"
                ))
            }
        };

        Value(core_value)
    }
}

impl ToValue for Value {
    fn to_value(&self) -> mysql_async::Value {
        match &self.0 {
            CoreValue::Null => mysql_async::Value::NULL,
            CoreValue::Bool(value) => value.to_value(),
            CoreValue::I64(value) => value.to_value(),
            CoreValue::F64(value) => value.to_value(),
            CoreValue::String(value) => value.to_value(),
            CoreValue::Date(value) => mysql_async::Value::Date(
                value.year() as u16,
                value.month() as u8,
                value.day() as u8,
                0,
                0,
                0,
                0,
            ),
            CoreValue::Timestamp(value) => mysql_async::Value::Date(
                value.year() as u16,
                value.month() as u8,
                value.day() as u8,
                value.hour() as u8,
                value.minute() as u8,
                value.second() as u8,
                value.and_utc().timestamp_subsec_micros(),
            ),
        }
    }
}
