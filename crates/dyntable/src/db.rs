//! Connections to the managed store.

mod connect;
pub use connect::Connect;

mod pool;
pub use pool::{Pool, PoolConfig, PoolConnection};

pub(crate) mod session;
pub(crate) use session::Session;

pub use dyntable_core::driver::{operation::Operation, Capability, Connection, Driver, Response};
