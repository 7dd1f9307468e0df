mod builder;
pub use builder::Builder;

use crate::{
    clock::Clock,
    db::{session::Handle, Pool, Session},
    Config, Result,
};

use chrono::{FixedOffset, NaiveDate, NaiveDateTime};
use dyntable_core::driver::Capability;
use std::sync::Arc;

/// Shared state between all `Engine` clones.
#[derive(Debug)]
struct Shared {
    pool: Pool,
    config: Config,
    clock: Arc<dyn Clock>,
    utc_offset: FixedOffset,
}

/// Handle to the managed store.
///
/// Cloning is cheap; clones share the connection pool. Every call checks a
/// connection out of the pool for its own duration, so calls on one handle
/// may run concurrently.
#[derive(Debug, Clone)]
pub struct Engine {
    shared: Arc<Shared>,
}

impl Engine {
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// Connects to `config.database_url` with the system clock.
    pub async fn connect(config: Config) -> Result<Engine> {
        Builder::default().config(config).connect().await
    }

    pub fn config(&self) -> &Config {
        &self.shared.config
    }

    pub fn capability(&self) -> &'static Capability {
        self.shared.pool.capability()
    }

    pub fn pool(&self) -> &Pool {
        &self.shared.pool
    }

    /// Current time in the reference timezone.
    pub(crate) fn now(&self) -> NaiveDateTime {
        self.shared
            .clock
            .now()
            .with_timezone(&self.shared.utc_offset)
            .naive_local()
    }

    /// Current calendar day in the reference timezone.
    pub(crate) fn today(&self) -> NaiveDate {
        self.now().date()
    }

    pub(crate) async fn session(&self) -> Result<Session> {
        let conn = self.shared.pool.get().await?;
        Ok(Session::new(
            Handle::Pooled(conn),
            self.shared.config.statement_timeout,
        ))
    }

    /// Round-trips to the managed store.
    pub async fn ping(&self) -> Result<()> {
        self.session().await?.ping().await
    }
}
