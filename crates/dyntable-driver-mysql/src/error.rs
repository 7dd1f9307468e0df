use dyntable_core::{ConnectionFailure, Error, Resource};

const ER_ACCESS_DENIED: u16 = 1045;
const ER_BAD_DB: u16 = 1049;
const ER_TABLE_EXISTS: u16 = 1050;
const ER_BAD_FIELD: u16 = 1054;
const ER_DUP_FIELDNAME: u16 = 1060;
const ER_CANT_DROP_FIELD_OR_KEY: u16 = 1091;
const ER_NO_SUCH_TABLE: u16 = 1146;
const ER_READ_ONLY_TRANSACTION: u16 = 1792;

/// Maps a statement error onto the engine's error classes.
pub(crate) fn classify(err: mysql_async::Error) -> Error {
    let mysql_async::Error::Server(server) = &err else {
        return Error::driver_operation_failed(err);
    };

    let message = server.message.clone();

    match server.code {
        ER_NO_SUCH_TABLE => Error::not_found(Resource::Table, message),
        ER_BAD_FIELD | ER_CANT_DROP_FIELD_OR_KEY => Error::not_found(Resource::Column, message),
        ER_TABLE_EXISTS | ER_DUP_FIELDNAME => Error::conflict(message),
        ER_READ_ONLY_TRANSACTION => Error::read_only(message),
        _ => Error::driver_operation_failed(err),
    }
}

/// Maps a connection error onto a [`ConnectionFailure`].
pub(crate) fn classify_connect(err: mysql_async::Error) -> Error {
    let kind = match &err {
        mysql_async::Error::Server(server) => match server.code {
            ER_ACCESS_DENIED => ConnectionFailure::Authentication,
            ER_BAD_DB => ConnectionFailure::DatabaseNotFound,
            _ => ConnectionFailure::Other,
        },
        mysql_async::Error::Io(_) => ConnectionFailure::Unreachable,
        _ => ConnectionFailure::Other,
    };

    Error::connection_failed(kind, err.to_string())
}
