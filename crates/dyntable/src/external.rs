//! Read-only access to external relational databases.
//!
//! Every operation opens its own connection from a [`DataSource`] and an
//! already decrypted password, runs inside a read-only transaction where the
//! dialect has one, and closes the connection before returning. Connections
//! are wrapped in [`ReadOnly`], which refuses anything but queries.

mod connector;
pub use connector::Connector;

mod data_source;
pub use data_source::{DataSource, DbType};

mod mount;
pub use mount::Mount;

mod read_only;
pub use read_only::ReadOnly;
