use dyntable::{Builder, Config, Engine};

use crate::{isolation::TestIsolation, Setup};

fn url() -> String {
    std::env::var("DYNTABLE_TEST_MYSQL_URL")
        .unwrap_or_else(|_| "mysql://localhost:3306/dyntable_test".to_string())
}

pub struct SetupMySQL {
    isolation: TestIsolation,
}

impl SetupMySQL {
    pub fn new() -> Self {
        Self {
            isolation: TestIsolation::new(),
        }
    }
}

impl Default for SetupMySQL {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Setup for SetupMySQL {
    async fn connect(&self, builder: Builder) -> dyntable::Result<Engine> {
        let config = Config {
            database_url: url(),
            ..Config::default()
        };
        builder.config(config).connect().await
    }

    fn table(&self, name: &str) -> String {
        format!("{}{name}", self.isolation.table_prefix())
    }

    async fn cleanup_my_tables(&self) -> dyntable::Result<()> {
        cleanup_mysql_tables(&self.isolation)
            .await
            .map_err(|e| dyntable_core::err!("MySQL cleanup failed: {e}"))
    }
}

async fn cleanup_mysql_tables(isolation: &TestIsolation) -> Result<(), Box<dyn std::error::Error>> {
    use mysql_async::prelude::*;

    let opts = mysql_async::Opts::from_url(&url())?;
    let pool = mysql_async::Pool::new(opts);
    let mut conn = pool.get_conn().await?;

    let my_prefix = isolation.table_prefix();

    let rows: Vec<String> = conn
        .query(format!(
            "SELECT table_name FROM information_schema.tables
         WHERE table_schema = DATABASE() AND table_name LIKE '{my_prefix}%'"
        ))
        .await?;

    for table_name in rows {
        if isolation.owns_table(&table_name) {
            let query = format!("DROP TABLE IF EXISTS `{table_name}`");
            let _ = conn.query_drop(&query).await;
        }
    }

    drop(conn);
    pool.disconnect().await?;
    Ok(())
}
