use super::{Engine, Shared};
use crate::{
    clock::{Clock, SystemClock},
    db::{Connect, Pool},
    Config, Result,
};

use dyntable_core::driver::Driver;
use std::sync::Arc;

#[derive(Debug, Default)]
pub struct Builder {
    config: Option<Config>,
    clock: Option<Arc<dyn Clock>>,
}

impl Builder {
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Time source for record timestamps. Defaults to [`SystemClock`].
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Connects to the configured `database_url`.
    pub async fn connect(self) -> Result<Engine> {
        let url = self
            .config
            .as_ref()
            .map(|config| config.database_url.clone())
            .unwrap_or_else(|| Config::default().database_url);

        self.build(Connect::new(&url)?).await
    }

    /// Builds an engine on top of an explicit driver.
    pub async fn build(self, driver: impl Driver) -> Result<Engine> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let utc_offset = config.utc_offset()?;
        let pool = Pool::new(driver, &config.pool).await?;

        tracing::debug!(
            pool.max_size = config.pool.max_size,
            utc_offset = %utc_offset,
            "engine ready"
        );

        Ok(Engine {
            shared: Arc::new(Shared {
                pool,
                config,
                clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
                utc_offset,
            }),
        })
    }
}
