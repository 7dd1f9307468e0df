use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use dyntable_core::stmt::{self, Value as CoreValue};
use postgres::{
    types::{private::BytesMut, to_sql_checked, IsNull, ToSql, Type},
    Column, Row,
};
use rust_decimal::{prelude::ToPrimitive, Decimal};

type BoxError = Box<dyn std::error::Error + Sync + Send>;

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

    /// Converts a PostgreSQL value within a row to a core value.
    ///
    /// Columns of types the engine has no representation for decode as
    /// text when the server can send them as such, and as null otherwise.
    pub fn from_sql(row: &Row, index: usize, column: &Column) -> Result<Self, tokio_postgres::Error> {
        // The PostgreSQL type enum's inner representation is not accessible,
        // so each type is matched by hand.
        let ty = column.type_();

        let value = if *ty == Type::BOOL {
            row.try_get::<_, Option<bool>>(index)?.map(CoreValue::Bool)
        } else if *ty == Type::INT2 {
            row.try_get::<_, Option<i16>>(index)?
                .map(|v| CoreValue::I64(v.into()))
        } else if *ty == Type::INT4 {
            row.try_get::<_, Option<i32>>(index)?
                .map(|v| CoreValue::I64(v.into()))
        } else if *ty == Type::INT8 {
            row.try_get::<_, Option<i64>>(index)?.map(CoreValue::I64)
        } else if *ty == Type::FLOAT4 {
            row.try_get::<_, Option<f32>>(index)?
                .map(|v| CoreValue::F64(v.into()))
        } else if *ty == Type::FLOAT8 {
            row.try_get::<_, Option<f64>>(index)?.map(CoreValue::F64)
        } else if *ty == Type::NUMERIC {
            row.try_get::<_, Option<Decimal>>(index)?.map(decimal_to_value)
        } else if *ty == Type::DATE {
            row.try_get::<_, Option<NaiveDate>>(index)?
                .map(CoreValue::Date)
        } else if *ty == Type::TIMESTAMP {
            row.try_get::<_, Option<NaiveDateTime>>(index)?
                .map(CoreValue::Timestamp)
        } else if *ty == Type::TIMESTAMPTZ {
            row.try_get::<_, Option<DateTime<Utc>>>(index)?
                .map(|v| CoreValue::Timestamp(v.naive_utc()))
        } else {
            match row.try_get::<_, Option<String>>(index) {
                Ok(value) => value.map(CoreValue::String),
                Err(_) => {
                    tracing::debug!(
                        column = column.name(),
                        ty = %ty,
                        "unsupported PostgreSQL type; reading as null"
                    );
                    None
                }
            }
        };

        Ok(Value(value.unwrap_or_default()))
    }
}

fn decimal_to_value(value: Decimal) -> CoreValue {
    if value.fract().is_zero() {
        if let Some(v) = value.to_i64() {
            return CoreValue::I64(v);
        }
    }

    match value.to_f64() {
        Some(v) => CoreValue::F64(v),
        None => CoreValue::String(value.to_string()),
    }
}

fn mismatch(value: &CoreValue, ty: &Type) -> BoxError {
    format!("cannot bind {} value to PostgreSQL type {ty}", value.type_name()).into()
}

impl ToSql for Value {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError>
    where
        Self: Sized,
    {
        // Parameter types are inferred by the server from the statement, so
        // each value converts to whatever the column at hand expects.
        match &self.0 {
            stmt::Value::Null => Ok(IsNull::Yes),
            stmt::Value::Bool(value) => value.to_sql(ty, out),
            stmt::Value::I64(value) => match *ty {
                Type::INT2 => i16::try_from(*value)?.to_sql(ty, out),
                Type::INT4 => i32::try_from(*value)?.to_sql(ty, out),
                Type::INT8 => value.to_sql(ty, out),
                Type::FLOAT4 => (*value as f32).to_sql(ty, out),
                Type::FLOAT8 => (*value as f64).to_sql(ty, out),
                Type::NUMERIC => Decimal::from(*value).to_sql(ty, out),
                Type::TEXT | Type::VARCHAR | Type::BPCHAR => value.to_string().to_sql(ty, out),
                _ => Err(mismatch(&self.0, ty)),
            },
            stmt::Value::F64(value) => match *ty {
                Type::FLOAT4 => (*value as f32).to_sql(ty, out),
                Type::FLOAT8 => value.to_sql(ty, out),
                Type::NUMERIC => Decimal::try_from(*value)?.to_sql(ty, out),
                Type::INT8 if value.fract() == 0.0 => (*value as i64).to_sql(ty, out),
                Type::TEXT | Type::VARCHAR | Type::BPCHAR => value.to_string().to_sql(ty, out),
                _ => Err(mismatch(&self.0, ty)),
            },
            stmt::Value::String(value) => match *ty {
                Type::NUMERIC => value.trim().parse::<Decimal>()?.to_sql(ty, out),
                _ => value.to_sql(ty, out),
            },
            stmt::Value::Date(value) => match *ty {
                Type::DATE => value.to_sql(ty, out),
                Type::TIMESTAMP => value.and_time(NaiveTime::MIN).to_sql(ty, out),
                Type::TIMESTAMPTZ => value.and_time(NaiveTime::MIN).and_utc().to_sql(ty, out),
                _ => Err(mismatch(&self.0, ty)),
            },
            stmt::Value::Timestamp(value) => match *ty {
                Type::TIMESTAMP => value.to_sql(ty, out),
                Type::TIMESTAMPTZ => value.and_utc().to_sql(ty, out),
                Type::DATE => value.date().to_sql(ty, out),
                _ => Err(mismatch(&self.0, ty)),
            },
        }
    }

    fn accepts(_: &Type) -> bool {
        true
    }

    to_sql_checked!();
}
