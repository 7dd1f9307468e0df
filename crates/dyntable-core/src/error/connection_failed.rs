use super::Error;

/// Why a connection to a database could not be established.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionFailure {
    /// The server rejected the credentials.
    Authentication,

    /// The host could not be reached (DNS, refused, timed out).
    Unreachable,

    /// The server accepted the connection but the target database does not
    /// exist.
    DatabaseNotFound,

    /// Anything the driver does not let us classify.
    Other,
}

impl core::fmt::Display for ConnectionFailure {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str(match self {
            ConnectionFailure::Authentication => "authentication",
            ConnectionFailure::Unreachable => "unreachable",
            ConnectionFailure::DatabaseNotFound => "database not found",
            ConnectionFailure::Other => "other",
        })
    }
}

/// Error when opening a connection fails.
#[derive(Debug)]
pub(super) struct ConnectionFailed {
    pub(super) kind: ConnectionFailure,
    message: Box<str>,
}

impl std::error::Error for ConnectionFailed {}

impl core::fmt::Display for ConnectionFailed {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "connection failed ({}): {}", self.kind, self.message)
    }
}

impl Error {
    /// Creates a connection failure error of the given kind.
    pub fn connection_failed(kind: ConnectionFailure, message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::ConnectionFailed(ConnectionFailed {
            kind,
            message: message.into().into(),
        }))
    }

    /// Returns the connection failure kind if this error is a connection
    /// failure.
    pub fn connection_failure(&self) -> Option<ConnectionFailure> {
        match self.kind() {
            super::ErrorKind::ConnectionFailed(err) => Some(err.kind),
            _ => None,
        }
    }

    /// Returns `true` if this error is a connection failure of any kind.
    pub fn is_connection_failed(&self) -> bool {
        self.connection_failure().is_some()
    }
}
