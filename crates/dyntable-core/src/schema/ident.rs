//! Identifier rules shared by table names, column names and field codes.
//!
//! Identifiers are validated before any statement is built. The serializer
//! quotes them as well, but validation is what keeps user-controlled names
//! from ever reaching SQL text unchecked.

use super::system::FIELD_COLUMN_PREFIX;
use crate::{Error, Result};

/// Longest identifier accepted. PostgreSQL truncates beyond 63 bytes.
pub const MAX_IDENTIFIER_LEN: usize = 63;

/// Longest field code. Its column, `f_<code>`, must fit in
/// [`MAX_IDENTIFIER_LEN`].
pub const MAX_FIELD_CODE_LEN: usize = MAX_IDENTIFIER_LEN - FIELD_COLUMN_PREFIX.len();

/// Validates a table or column identifier: `[A-Za-z_][A-Za-z0-9_]*`, at most
/// [`MAX_IDENTIFIER_LEN`] characters.
pub fn validate_identifier(what: &str, ident: &str) -> Result<()> {
    let mut chars = ident.chars();

    match chars.next() {
        None => return Err(Error::validation(format!("{what} must not be empty"))),
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        Some(_) => {
            return Err(Error::validation(format!(
                "{what} `{ident}` must start with a letter or underscore"
            )))
        }
    }

    if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(Error::validation(format!(
            "{what} `{ident}` may only contain letters, digits and underscores"
        )));
    }

    check_len(what, ident)
}

/// Validates a field code: `^[A-Za-z][A-Za-z0-9_]*$`, at most
/// [`MAX_FIELD_CODE_LEN`] characters.
pub fn validate_field_code(code: &str) -> Result<()> {
    if code.starts_with('_') {
        return Err(Error::validation(format!(
            "field code `{code}` must start with a letter"
        )));
    }

    validate_identifier("field code", code)?;
    check_len_within("field code", code, MAX_FIELD_CODE_LEN)
}

fn check_len(what: &str, ident: &str) -> Result<()> {
    check_len_within(what, ident, MAX_IDENTIFIER_LEN)
}

fn check_len_within(what: &str, ident: &str, max: usize) -> Result<()> {
    if ident.len() > max {
        return Err(Error::validation(format!(
            "{what} `{ident}` is longer than {max} characters"
        )));
    }
    Ok(())
}
