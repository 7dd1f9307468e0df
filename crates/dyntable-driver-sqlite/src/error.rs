use dyntable_core::{ConnectionFailure, Error, Resource};
use rusqlite::ErrorCode;

/// Maps a SQLite error onto the engine's error classes.
///
/// SQLite reports schema problems as generic `SQLITE_ERROR`s, so the message
/// text is the only way to tell them apart.
pub(crate) fn classify(err: rusqlite::Error) -> Error {
    let (code, message) = match &err {
        rusqlite::Error::SqliteFailure(failure, message) => {
            (failure.code, message.clone().unwrap_or_default())
        }
        _ => return Error::driver_operation_failed(err),
    };

    if let Some(table) = message.strip_prefix("no such table: ") {
        return Error::not_found(Resource::Table, table);
    }

    if let Some(column) = message.strip_prefix("no such column: ") {
        return Error::not_found(Resource::Column, column);
    }

    // `table t has no column named c`, reported by INSERT
    if let Some((_, column)) = message.split_once(" has no column named ") {
        return Error::not_found(Resource::Column, column);
    }

    if message.starts_with("duplicate column name")
        || (message.starts_with("table ") && message.ends_with("already exists"))
    {
        return Error::conflict(message);
    }

    match code {
        ErrorCode::ReadOnly => Error::read_only(message),
        ErrorCode::CannotOpen => {
            Error::connection_failed(ConnectionFailure::DatabaseNotFound, message)
        }
        _ => Error::driver_operation_failed(err),
    }
}
