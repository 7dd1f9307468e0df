use super::{ident, system, FieldType};
use crate::{stmt::Value, Error, Result};

use serde::{Deserialize, Serialize};

/// A user-declared field of an application.
///
/// The engine never stores field metadata itself. Callers pass the live list
/// of fields on every call and the engine derives physical columns from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppField {
    #[serde(default)]
    pub id: i64,

    #[serde(default)]
    pub app_id: i64,

    /// Stable code used as the record key, unique per application.
    pub field_code: String,

    /// Display name.
    pub field_name: String,

    pub field_type: FieldType,

    #[serde(default)]
    pub display_order: i32,

    #[serde(default)]
    pub constraints: FieldConstraints,
}

/// Write-time constraints of a field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldConstraints {
    /// Rejects missing or null values on insert and null on update.
    #[serde(default)]
    pub required: bool,

    /// Maximum length, in characters, of textual values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,

    /// Allowed values of a `select` field. Empty means unrestricted.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

impl AppField {
    pub fn new(
        field_code: impl Into<String>,
        field_name: impl Into<String>,
        field_type: FieldType,
    ) -> Self {
        Self {
            id: 0,
            app_id: 0,
            field_code: field_code.into(),
            field_name: field_name.into(),
            field_type,
            display_order: 0,
            constraints: FieldConstraints::default(),
        }
    }

    pub fn required(mut self) -> Self {
        self.constraints.required = true;
        self
    }

    pub fn max_length(mut self, max: usize) -> Self {
        self.constraints.max_length = Some(max);
        self
    }

    pub fn options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.constraints.options = options.into_iter().map(Into::into).collect();
        self
    }

    /// Checks the field code and that the constraints fit the field type.
    pub fn validate(&self) -> Result<()> {
        ident::validate_field_code(&self.field_code)?;

        if self.constraints.max_length.is_some() && !self.field_type.is_textual() {
            return Err(Error::validation(format!(
                "field `{}`: max_length only applies to textual fields",
                self.field_code
            )));
        }

        if !self.constraints.options.is_empty() && self.field_type != FieldType::Select {
            return Err(Error::validation(format!(
                "field `{}`: options only apply to select fields",
                self.field_code
            )));
        }

        Ok(())
    }

    /// Physical column of this field in a managed table.
    pub fn column_name(&self) -> String {
        format!("{}{}", system::FIELD_COLUMN_PREFIX, self.field_code)
    }

    /// Coerces a value for writing and enforces the field's constraints.
    pub fn coerce_write(&self, value: Value) -> Result<Value> {
        let value = self
            .field_type
            .coerce_input(value)
            .map_err(|err| err.context(format!("field `{}`", self.field_code)))?;

        let Value::String(s) = &value else {
            if value.is_null() && self.constraints.required {
                return Err(self.missing());
            }
            return Ok(value);
        };

        if let Some(max) = self.constraints.max_length {
            let len = s.chars().count();
            if len > max {
                return Err(Error::validation_length(&self.field_code, len, max));
            }
        }

        if !self.constraints.options.is_empty() && !self.constraints.options.contains(s) {
            return Err(Error::validation(format!(
                "field `{}`: `{s}` is not one of the allowed options",
                self.field_code
            )));
        }

        if s.is_empty() && self.constraints.required {
            return Err(self.missing());
        }

        Ok(value)
    }

    /// Error for a required field without a value.
    pub fn missing(&self) -> Error {
        Error::validation(format!("field `{}` is required", self.field_code))
    }
}
