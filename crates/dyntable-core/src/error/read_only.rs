use super::Error;

/// Error when a write is attempted against a read-only target.
///
/// Returned by the external connector guard for any non-query statement, and
/// by drivers when the database itself refuses a write inside a read-only
/// transaction (e.g. PostgreSQL SQLSTATE 25006, MySQL error 1792).
#[derive(Debug)]
pub(super) struct ReadOnly {
    message: Box<str>,
}

impl std::error::Error for ReadOnly {}

impl core::fmt::Display for ReadOnly {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "read-only: {}", self.message)
    }
}

impl Error {
    /// Creates a read-only error.
    pub fn read_only(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::ReadOnly(ReadOnly {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is a read-only error.
    pub fn is_read_only(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::ReadOnly(_))
    }
}
