use crate::{schema::ident, Result};

use std::fmt;

/// A possibly schema-qualified table name.
///
/// Every part has passed identifier validation, so the serializer only has to
/// quote it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Name(Vec<String>);

impl Name {
    /// Parses `table` or `schema.table`, validating each part.
    pub fn parse(name: &str) -> Result<Name> {
        let parts = name.split('.').collect::<Vec<_>>();

        if parts.len() > 2 {
            return Err(crate::Error::validation(format!(
                "table name `{name}` has too many parts"
            )));
        }

        for part in &parts {
            ident::validate_identifier("table name", part)?;
        }

        Ok(Name(parts.into_iter().map(String::from).collect()))
    }

    pub fn parts(&self) -> &[String] {
        &self.0
    }

    /// The unqualified table name.
    pub fn table(&self) -> &str {
        self.0.last().map(String::as_str).unwrap_or_default()
    }

    /// The schema qualifier, if any.
    pub fn schema(&self) -> Option<&str> {
        match &self.0[..] {
            [schema, _] => Some(schema),
            _ => None,
        }
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = "";
        for ident in &self.0 {
            write!(f, "{s}{ident}")?;
            s = ".";
        }

        Ok(())
    }
}
