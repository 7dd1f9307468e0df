use dyntable::{AppField, FieldType, Record, RecordQueryOptions, Value};
use tests::{expense_fields, record, tests, Setup};

async fn create_insert_read_drop(s: &dyn Setup) {
    let engine = s.engine().await;
    let table = s.table("app_1");
    let fields = expense_fields();

    engine.create_table(&table, &fields).await.unwrap();

    let id = engine
        .insert_record(
            &table,
            &fields,
            record([("category", "A".into()), ("amount", 10.into())]),
            1,
        )
        .await
        .unwrap();

    let found = engine.get_record_by_id(&table, &fields, id).await.unwrap();
    assert_eq!(found.id, Value::I64(id));
    assert_eq!(found.created_by, Some(1));
    assert_eq!(found.data["category"], Value::from("A"));
    assert_eq!(found.data["amount"], Value::I64(10));
    assert_eq!(found.data["note"], Value::Null);

    engine.drop_table(&table).await.unwrap();

    let err = engine
        .get_records(&table, &fields, &RecordQueryOptions::new())
        .await
        .unwrap_err();
    assert!(err.is_not_found(), "{err}");

    engine.drop_table_if_exists(&table).await.unwrap();
}

async fn create_twice_conflicts(s: &dyn Setup) {
    let engine = s.engine().await;
    let table = s.table("app_2");

    engine.create_table(&table, &expense_fields()).await.unwrap();

    let err = engine
        .create_table(&table, &expense_fields())
        .await
        .unwrap_err();
    assert!(err.is_conflict(), "{err}");
}

async fn invalid_definitions_are_rejected(s: &dyn Setup) {
    let engine = s.engine().await;

    let err = engine
        .create_table("app; drop table x", &expense_fields())
        .await
        .unwrap_err();
    assert!(err.is_validation());

    let duplicate = vec![
        AppField::new("name", "Name", FieldType::Text),
        AppField::new("name", "Other", FieldType::Text),
    ];
    let err = engine
        .create_table(&s.table("app_3"), &duplicate)
        .await
        .unwrap_err();
    assert!(err.is_conflict());

    let bad_code = vec![AppField::new("Bad Code", "Bad", FieldType::Text)];
    let err = engine
        .create_table(&s.table("app_3"), &bad_code)
        .await
        .unwrap_err();
    assert!(err.is_validation());
}

async fn add_and_drop_columns(s: &dyn Setup) {
    let engine = s.engine().await;
    let table = s.table("app_4");
    let mut fields = expense_fields();

    engine.create_table(&table, &fields).await.unwrap();
    let column_names = |columns: Vec<dyntable::ColumnInfo>| {
        columns.into_iter().map(|c| c.name).collect::<Vec<_>>()
    };
    let original = column_names(engine.list_columns(&table).await.unwrap());
    assert_eq!(original.len(), 4 + fields.len());

    engine
        .insert_record(&table, &fields, record([("note", "before".into())]), 1)
        .await
        .unwrap();

    let due = AppField::new("due", "Due", FieldType::Date);
    engine.add_column(&table, &due).await.unwrap();
    fields.push(due.clone());

    let columns = engine.list_columns(&table).await.unwrap();
    assert!(columns.iter().any(|c| c.name == "f_due" && c.is_nullable));
    assert!(columns.iter().any(|c| c.name == "id" && c.is_primary_key));

    // Existing rows read the new column as null.
    let (records, _) = engine
        .get_records(&table, &fields, &RecordQueryOptions::new())
        .await
        .unwrap();
    assert_eq!(records[0].data["due"], Value::Null);
    assert_eq!(records[0].data["note"], Value::from("before"));

    let err = engine.add_column(&table, &due).await.unwrap_err();
    assert!(err.is_conflict(), "{err}");

    engine
        .drop_column(&table, &engine.column_name(&due))
        .await
        .unwrap();
    fields.pop();

    // Back to exactly the columns the table was created with.
    let columns = engine.list_columns(&table).await.unwrap();
    assert_eq!(column_names(columns), original);

    let err = engine.drop_column(&table, "f_due").await.unwrap_err();
    assert!(err.is_not_found(), "{err}");

    for system in ["id", "created_by", "created_at", "updated_at"] {
        assert!(engine
            .drop_column(&table, system)
            .await
            .unwrap_err()
            .is_validation());
    }
}

async fn field_persistence_failure_drops_column(s: &dyn Setup) {
    let engine = s.engine().await;
    let table = s.table("app_5");
    engine.create_table(&table, &expense_fields()).await.unwrap();

    let field = AppField::new("rating", "Rating", FieldType::Number);
    let err = engine
        .add_field_with(&table, &field, async {
            Err::<(), _>(dyntable::Error::unavailable("metadata store down"))
        })
        .await
        .unwrap_err();
    assert!(err.is_unavailable());

    let columns = engine.list_columns(&table).await.unwrap();
    assert!(!columns.iter().any(|c| c.name == "f_rating"));

    let id = engine
        .add_field_with(&table, &field, async { Ok(42) })
        .await
        .unwrap();
    assert_eq!(id, 42);

    let removed: Record = engine
        .drop_field_with(&table, &field, async { Ok(Record::new()) })
        .await
        .unwrap();
    assert!(removed.is_empty());
}

tests!(
    create_insert_read_drop,
    create_twice_conflicts,
    invalid_definitions_are_rejected,
    add_and_drop_columns,
    field_persistence_failure_drops_column,
);
