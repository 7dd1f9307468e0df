mod capability;
pub use capability::Capability;

mod response;
pub use response::{Response, Rows};

pub mod operation;
pub use operation::Operation;

use crate::async_trait;

use std::fmt::Debug;

#[async_trait]
pub trait Driver: Debug + Send + Sync + 'static {
    /// Describes the driver's capability, which informs the engine.
    fn capability(&self) -> &'static Capability;

    /// Opens a new connection.
    async fn connect(&self) -> crate::Result<Box<dyn Connection>>;

    /// Upper bound on concurrent connections the backend tolerates, if any.
    /// An in-memory SQLite database only exists on one connection.
    fn max_connections(&self) -> Option<usize> {
        None
    }
}

#[async_trait]
pub trait Connection: Debug + Send + 'static {
    fn capability(&self) -> &'static Capability;

    /// Execute a database operation
    async fn exec(&mut self, op: Operation) -> crate::Result<Response>;

    /// Closes the connection, waiting for the server to acknowledge when the
    /// protocol has a goodbye. Dropping a connection also closes it.
    async fn close(self: Box<Self>) -> crate::Result<()> {
        Ok(())
    }
}
