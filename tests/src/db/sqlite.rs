use dyntable::{Builder, Config, Engine};

use crate::Setup;

/// A fresh in-memory database per test. Nothing to clean up.
pub struct SetupSqlite;

impl SetupSqlite {
    pub fn new() -> Self {
        SetupSqlite
    }
}

impl Default for SetupSqlite {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Setup for SetupSqlite {
    async fn connect(&self, builder: Builder) -> dyntable::Result<Engine> {
        let config = Config {
            database_url: "sqlite::memory:".to_string(),
            ..Config::default()
        };
        builder.config(config).connect().await
    }
}
