#![cfg(feature = "sqlite")]

use dyntable::{
    external::ReadOnly, AppField, ChartDataRequest, ConnectionFailure, Connector, DataSource,
    DbType, Direction, FieldType, FilterItem, Mount, Operator, RecordQueryOptions, RecordSource,
    Value,
};
use dyntable_core::{
    driver::{operation::Transaction, Connection},
    stmt::{Name, Statement},
};
use pretty_assertions::assert_eq;
use std::path::Path;
use tempfile::TempDir;

fn book_fields() -> Vec<AppField> {
    vec![
        AppField::new("title", "Title", FieldType::Text),
        AppField::new("genre", "Genre", FieldType::Text),
        AppField::new("pages", "Pages", FieldType::Number),
    ]
}

/// A library database with a keyed `books` table and a keyless `events` log.
fn fixture() -> (TempDir, String) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("library.db");

    let conn = rusqlite::Connection::open(&path).unwrap();
    conn.execute_batch(
        "CREATE TABLE books (
             book_id INTEGER PRIMARY KEY,
             title TEXT NOT NULL,
             genre TEXT,
             pages INTEGER
         );
         INSERT INTO books (book_id, title, genre, pages) VALUES
             (10, 'Dune', 'scifi', 412),
             (11, 'Emma', 'classic', 474),
             (12, 'Solaris', 'scifi', 204),
             (13, 'Untitled', NULL, NULL);
         CREATE TABLE events (title TEXT, genre TEXT, pages INTEGER);
         INSERT INTO events VALUES ('opened', 'log', 1);",
    )
    .unwrap();

    let path = path.to_str().unwrap().to_string();
    (dir, path)
}

fn mount(path: &str) -> Mount {
    let ds = DataSource::new("library", DbType::Sqlite, path);
    Mount::with_password(Connector::default(), ds, "")
}

#[tokio::test]
async fn introspection() {
    let (_dir, path) = fixture();
    let mount = mount(&path);

    mount.test_connection().await.unwrap();

    let mut tables: Vec<_> = mount
        .get_tables()
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.name)
        .collect();
    tables.sort();
    assert_eq!(tables, vec!["books", "events"]);

    let columns = mount.get_columns("books").await.unwrap();
    let names: Vec<_> = columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["book_id", "title", "genre", "pages"]);
    assert!(columns[0].is_primary_key);
    assert!(!columns[1].is_nullable);

    let err = mount.get_columns("missing").await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn records_through_record_source() {
    let (_dir, path) = fixture();
    let source: Box<dyn RecordSource> = Box::new(mount(&path));
    let fields = book_fields();

    let opts = RecordQueryOptions::new()
        .limit(2)
        .sort("pages", Direction::Desc)
        .filter(FilterItem::new("genre", Operator::IsNotNull, serde_json::Value::Null));
    let (records, total) = source.get_records("books", &fields, &opts).await.unwrap();

    assert_eq!(total, 3);
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].id, Value::I64(11));
    assert_eq!(records[0].data["title"], Value::from("Emma"));
    assert_eq!(records[1].data["pages"], Value::I64(412));
    assert_eq!(records[0].created_at, None);

    let record = source
        .get_record_by_id("books", &fields, Value::I64(12))
        .await
        .unwrap();
    assert_eq!(record.data["title"], Value::from("Solaris"));

    // Ids arriving as strings bind against the integer key.
    let record = source
        .get_record_by_id("books", &fields, Value::from("12"))
        .await
        .unwrap();
    assert_eq!(record.id, Value::I64(12));

    let err = source
        .get_record_by_id("books", &fields, Value::from("twelve"))
        .await
        .unwrap_err();
    assert!(err.is_validation(), "{err}");

    let err = source
        .get_record_by_id("books", &fields, Value::I64(99))
        .await
        .unwrap_err();
    assert!(err.is_record_not_found());

    // Without a single-column primary key there is no way to address a row.
    let err = source
        .get_record_by_id("events", &fields, Value::I64(1))
        .await
        .unwrap_err();
    assert!(err.is_validation());

    let (records, _) = source
        .get_records("events", &fields, &RecordQueryOptions::new())
        .await
        .unwrap();
    assert_eq!(records[0].id, Value::Null);

    assert_eq!(source.count_records("books").await.unwrap(), 4);

    let chart = source
        .get_aggregated_data("books", &fields, &ChartDataRequest::count("genre"))
        .await
        .unwrap();
    assert_eq!(chart.labels, vec!["classic", "scifi"]);
    assert_eq!(chart.datasets[0].data, vec![1.0, 2.0]);
}

#[tokio::test]
async fn connection_failures_are_classified() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope").join("missing.db");

    let err = mount(missing.to_str().unwrap())
        .test_connection()
        .await
        .unwrap_err();
    assert_eq!(
        err.connection_failure(),
        Some(ConnectionFailure::DatabaseNotFound),
        "{err}"
    );

    let ds = DataSource::new("library", DbType::Sqlite, "");
    let err = Connector::default()
        .test_connection(&ds, "")
        .await
        .unwrap_err();
    assert!(err.is_validation());
}

#[tokio::test]
async fn writes_are_refused() {
    let (_dir, path) = fixture();

    let conn = dyntable_driver_sqlite::Connection::open(Path::new(&path), false).unwrap();
    let mut guarded: Box<dyn Connection> = Box::new(ReadOnly::new(Box::new(conn)));

    let books = Name::parse("books").unwrap();
    for stmt in [
        Statement::drop_table(books.clone()),
        Statement::drop_column(books.clone(), "pages"),
    ] {
        let err = guarded.exec(stmt.into()).await.unwrap_err();
        assert!(err.is_read_only(), "{err}");
    }

    let err = guarded
        .exec(Transaction::start().into())
        .await
        .unwrap_err();
    assert!(err.is_read_only());

    guarded
        .exec(Transaction::start_read_only().into())
        .await
        .unwrap();
    guarded.exec(Transaction::Rollback.into()).await.unwrap();
    guarded.close().await.unwrap();

    // The table is untouched.
    let (records, total) = mount(&path)
        .get_records("books", &book_fields(), &RecordQueryOptions::new())
        .await
        .unwrap();
    assert_eq!(total, 4);
    assert_eq!(records.len(), 4);
}
