//! Connection pooling for database connections.

use std::{
    ops::{Deref, DerefMut},
    time::Duration,
};

use deadpool::managed::Timeouts;
use dyntable_core::driver::{Capability, Connection, Driver};
use serde::Deserialize;

use crate::db::Connect;

/// Get the default maximum size of a pool, which is `cpu_core_count * 2`
/// including logical cores (Hyper-Threading).
fn get_default_pool_max_size() -> usize {
    deadpool::managed::PoolConfig::default().max_size
}

/// Configuration for connection pool behavior.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    pub max_size: usize,

    /// How long a caller waits for a free connection. `None` waits forever.
    #[serde(rename = "wait_timeout_ms", with = "crate::config::millis::option")]
    pub wait_timeout: Option<Duration>,
}

impl PoolConfig {
    /// Creates a new pool configuration with default settings.
    pub fn new() -> Self {
        Self {
            max_size: get_default_pool_max_size(),
            wait_timeout: None,
        }
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// A connection pool that manages database connections.
#[derive(Debug)]
pub struct Pool {
    inner: deadpool::managed::Pool<Manager>,
    capability: &'static Capability,
}

impl Pool {
    /// Creates a new connection pool from the given driver.
    ///
    /// The driver's own connection limit, if any, caps `config.max_size`.
    pub async fn new(driver: impl Driver, config: &PoolConfig) -> crate::Result<Self> {
        let capability = driver.capability();
        let max_size = match driver.max_connections() {
            Some(max_connections) => config.max_size.min(max_connections),
            None => config.max_size,
        };

        let inner = deadpool::managed::Pool::builder(Manager {
            driver: Box::new(driver),
        })
        .runtime(deadpool::Runtime::Tokio1)
        .max_size(max_size)
        .timeouts(Timeouts {
            wait: config.wait_timeout,
            ..Timeouts::default()
        })
        .build()
        .map_err(dyntable_core::Error::connection_pool)?;

        // Surface connection errors at startup rather than on first use.
        let connection = inner
            .get()
            .await
            .map_err(unwrap_pool_error)?;
        drop(connection);

        Ok(Self { inner, capability })
    }

    /// Creates a new connection pool from a connection URL.
    pub async fn connect(url: &str, config: &PoolConfig) -> crate::Result<Self> {
        Self::new(Connect::new(url)?, config).await
    }

    /// Retrieves a connection from the pool.
    pub async fn get(&self) -> crate::Result<PoolConnection> {
        let connection = self.inner.get().await.map_err(unwrap_pool_error)?;
        Ok(PoolConnection { inner: connection })
    }

    /// Returns the database driver's capabilities.
    pub fn capability(&self) -> &'static Capability {
        self.capability
    }

    /// Number of connections currently held by the pool, idle or checked out.
    pub fn size(&self) -> usize {
        self.inner.status().size
    }
}

/// Errors raised by the driver while creating a connection keep their own
/// classification; everything else is a pool error.
fn unwrap_pool_error(err: deadpool::managed::PoolError<crate::Error>) -> crate::Error {
    match err {
        deadpool::managed::PoolError::Backend(err) => err,
        err => dyntable_core::Error::connection_pool(err),
    }
}

#[derive(Debug)]
struct Manager {
    driver: Box<dyn Driver>,
}

impl deadpool::managed::Manager for Manager {
    type Type = Box<dyn Connection>;
    type Error = crate::Error;

    async fn create(&self) -> Result<Self::Type, Self::Error> {
        self.driver.connect().await
    }

    async fn recycle(
        &self,
        _obj: &mut Self::Type,
        _metrics: &deadpool::managed::Metrics,
    ) -> deadpool::managed::RecycleResult<Self::Error> {
        Ok(())
    }
}

/// A connection retrieved from a pool.
///
/// When dropped, the connection is returned to the pool for reuse.
pub struct PoolConnection {
    inner: deadpool::managed::Object<Manager>,
}

impl PoolConnection {
    /// Removes the connection from the pool and drops it. Used when the
    /// connection may still be inside a transaction or mid-statement.
    pub fn discard(self) {
        drop(deadpool::managed::Object::take(self.inner));
    }
}

impl std::fmt::Debug for PoolConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("PoolConnection").field(&**self.inner).finish()
    }
}

impl Deref for PoolConnection {
    type Target = dyn Connection;

    fn deref(&self) -> &Self::Target {
        &**self.inner
    }
}

impl DerefMut for PoolConnection {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut **self.inner
    }
}
