use super::Error;

/// The kind of object a not-found error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Table,
    Column,
    Field,
    DataSource,
}

impl core::fmt::Display for Resource {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str(match self {
            Resource::Table => "table",
            Resource::Column => "column",
            Resource::Field => "field",
            Resource::DataSource => "data source",
        })
    }
}

/// Error when a table, column, field or data source does not exist.
///
/// Drivers produce this when the database reports schema drift, e.g. a
/// statement referencing a table that was dropped underneath the metadata.
#[derive(Debug)]
pub(super) struct NotFound {
    resource: Resource,
    name: Box<str>,
}

impl std::error::Error for NotFound {}

impl core::fmt::Display for NotFound {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "{} not found: {}", self.resource, self.name)
    }
}

impl Error {
    /// Creates a not-found error for the given resource.
    pub fn not_found(resource: Resource, name: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::NotFound(NotFound {
            resource,
            name: name.into().into(),
        }))
    }

    /// Returns `true` if something the caller referenced does not exist.
    ///
    /// This includes missing records.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self.kind(),
            super::ErrorKind::NotFound(_) | super::ErrorKind::RecordNotFound(_)
        )
    }

    /// Returns the missing resource, if this is a (non-record) not-found error.
    pub fn not_found_resource(&self) -> Option<Resource> {
        match self.kind() {
            super::ErrorKind::NotFound(err) => Some(err.resource),
            _ => None,
        }
    }
}
