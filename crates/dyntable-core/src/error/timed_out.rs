use super::Error;

use std::time::Duration;

/// Error when a statement or a connection attempt exceeds its deadline.
#[derive(Debug)]
pub(super) struct TimedOut {
    operation: Box<str>,
    after: Duration,
}

impl std::error::Error for TimedOut {}

impl core::fmt::Display for TimedOut {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "{} timed out after {}ms",
            self.operation,
            self.after.as_millis()
        )
    }
}

impl Error {
    /// Creates a timeout error for the named operation.
    pub fn timed_out(operation: impl Into<String>, after: Duration) -> Error {
        Error::from(super::ErrorKind::TimedOut(TimedOut {
            operation: operation.into().into(),
            after,
        }))
    }

    /// Returns `true` if this error is a timeout.
    pub fn is_timed_out(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::TimedOut(_))
    }
}
