use dyntable::{Builder, Config, Engine};

use crate::{isolation::TestIsolation, Setup};

fn url() -> String {
    std::env::var("DYNTABLE_TEST_POSTGRESQL_URL")
        .unwrap_or_else(|_| "postgresql://localhost:5432/dyntable_test".to_string())
}

pub struct SetupPostgreSQL {
    isolation: TestIsolation,
}

impl SetupPostgreSQL {
    pub fn new() -> Self {
        Self {
            isolation: TestIsolation::new(),
        }
    }
}

impl Default for SetupPostgreSQL {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Setup for SetupPostgreSQL {
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
        cleanup_postgresql_tables(&self.isolation)
            .await
            .map_err(|e| dyntable_core::err!("PostgreSQL cleanup failed: {e}"))
    }
}

async fn cleanup_postgresql_tables(
    isolation: &TestIsolation,
) -> Result<(), Box<dyn std::error::Error>> {
    use tokio_postgres::NoTls;

    let (client, connection) = tokio_postgres::connect(&url(), NoTls).await?;

    tokio::spawn(async move {
        if let Err(e) = connection.await {
            eprintln!("PostgreSQL connection error during cleanup: {e}");
        }
    });

    let rows = client
        .query(
            "SELECT table_name FROM information_schema.tables
         WHERE table_schema = 'public' AND table_name LIKE $1",
            &[&format!("{}%", isolation.table_prefix())],
        )
        .await?;

    for row in rows {
        let table_name: String = row.get(0);
        if isolation.owns_table(&table_name) {
            let query = format!("DROP TABLE IF EXISTS \"{table_name}\"");
            let _ = client.execute(&query, &[]).await;
        }
    }

    Ok(())
}
