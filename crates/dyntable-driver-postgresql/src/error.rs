use dyntable_core::{ConnectionFailure, Error, Resource};
use tokio_postgres::error::SqlState;

/// Maps a statement error onto the engine's error classes.
pub(crate) fn classify(err: tokio_postgres::Error) -> Error {
    let Some(db) = err.as_db_error() else {
        return Error::driver_operation_failed(err);
    };

    let message = db.message().to_string();

    match db.code() {
        c if *c == SqlState::UNDEFINED_TABLE => Error::not_found(Resource::Table, message),
        c if *c == SqlState::UNDEFINED_COLUMN => Error::not_found(Resource::Column, message),
        c if *c == SqlState::DUPLICATE_TABLE || *c == SqlState::DUPLICATE_COLUMN => {
            Error::conflict(message)
        }
        c if *c == SqlState::READ_ONLY_SQL_TRANSACTION => Error::read_only(message),
        _ => Error::driver_operation_failed(err),
    }
}

/// Maps a connection error onto a [`ConnectionFailure`].
pub(crate) fn classify_connect(err: tokio_postgres::Error) -> Error {
    let kind = match err.code() {
        Some(c) if *c == SqlState::INVALID_PASSWORD => ConnectionFailure::Authentication,
        Some(c) if *c == SqlState::INVALID_AUTHORIZATION_SPECIFICATION => {
            ConnectionFailure::Authentication
        }
        Some(c) if *c == SqlState::INVALID_CATALOG_NAME => ConnectionFailure::DatabaseNotFound,
        Some(_) => ConnectionFailure::Other,
        // No SQLSTATE means the server never answered: DNS, refused, reset.
        None => ConnectionFailure::Unreachable,
    };

    Error::connection_failed(kind, err.to_string())
}
