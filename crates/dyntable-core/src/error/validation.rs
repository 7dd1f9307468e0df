use super::Error;

/// Error when caller input fails validation.
#[derive(Debug)]
pub(super) struct ValidationError {
    pub(super) kind: ValidationErrorKind,
}

#[derive(Debug)]
pub(super) enum ValidationErrorKind {
    /// Free-form validation failure (unknown field, bad operator, ...)
    Message(Box<str>),

    /// String length constraint violation
    Length {
        field: Box<str>,
        value_len: usize,
        max: usize,
    },
}

impl std::error::Error for ValidationError {}

impl core::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match &self.kind {
            ValidationErrorKind::Message(message) => write!(f, "validation failed: {message}"),
            ValidationErrorKind::Length {
                field,
                value_len,
                max,
            } => write!(
                f,
                "validation failed: `{field}` value length {value_len} is too long (maximum: {max})"
            ),
        }
    }
}

impl Error {
    /// Creates a validation error with a message.
    pub fn validation(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::Validation(ValidationError {
            kind: ValidationErrorKind::Message(message.into().into()),
        }))
    }

    /// Creates a validation error for a value exceeding the field's maximum
    /// length.
    pub fn validation_length(field: &str, value_len: usize, max: usize) -> Error {
        Error::from(super::ErrorKind::Validation(ValidationError {
            kind: ValidationErrorKind::Length {
                field: field.into(),
                value_len,
                max,
            },
        }))
    }

    /// Returns `true` if this error is a validation error.
    pub fn is_validation(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::Validation(_))
    }
}
