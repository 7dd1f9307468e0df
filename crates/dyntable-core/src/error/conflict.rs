use super::Error;

/// Error when a named object already exists.
///
/// This occurs when:
/// - A table is created under a name that is already taken
/// - A column is added with the name of an existing column
/// - A field list declares the same field code twice
#[derive(Debug)]
pub(super) struct Conflict {
    message: Box<str>,
}

impl std::error::Error for Conflict {}

impl core::fmt::Display for Conflict {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "conflict: {}", self.message)
    }
}

impl Error {
    /// Creates a conflict error.
    pub fn conflict(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::Conflict(Conflict {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is a conflict error.
    pub fn is_conflict(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::Conflict(_))
    }
}
