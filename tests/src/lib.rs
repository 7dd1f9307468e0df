#[macro_use]
mod macros;

pub mod db;
mod db_test;
mod isolation;

// Re-export for use in macros - needs to be public for macro expansion
pub use db_test::DbTest;

use dyntable::{AppField, Builder, Engine, FieldType, Record, Value};

#[async_trait::async_trait]
pub trait Setup: Send + Sync + 'static {
    /// Connects an engine to this setup's database.
    async fn connect(&self, builder: Builder) -> dyntable::Result<Engine>;

    /// Physical name for `name`, unique to this test.
    fn table(&self, name: &str) -> String {
        name.to_string()
    }

    /// Clean up tables created by this specific setup instance.
    async fn cleanup_my_tables(&self) -> dyntable::Result<()> {
        Ok(())
    }

    async fn engine(&self) -> Engine {
        self.connect(Engine::builder()).await.unwrap()
    }
}

/// `category` (select), `amount` (number) and `note` (text).
pub fn expense_fields() -> Vec<AppField> {
    vec![
        AppField::new("category", "Category", FieldType::Select).options(["A", "B", "C"]),
        AppField::new("amount", "Amount", FieldType::Number),
        AppField::new("note", "Note", FieldType::Text),
    ]
}

pub fn record<const N: usize>(pairs: [(&str, Value); N]) -> Record {
    pairs
        .into_iter()
        .map(|(code, value)| (code.to_string(), value))
        .collect()
}
