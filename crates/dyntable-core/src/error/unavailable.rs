use super::Error;

/// Error when a subsystem required for the operation is not configured.
///
/// The encryption key missing at startup is the canonical case. It is an
/// operational condition rather than a data problem, so callers map it to
/// "service unavailable" instead of a client error.
#[derive(Debug)]
pub(super) struct Unavailable {
    message: Box<str>,
}

impl std::error::Error for Unavailable {}

impl core::fmt::Display for Unavailable {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "unavailable: {}", self.message)
    }
}

impl Error {
    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::Unavailable(Unavailable {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is an unavailable error.
    pub fn is_unavailable(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::Unavailable(_))
    }
}
