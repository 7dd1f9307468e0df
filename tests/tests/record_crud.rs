use dyntable::{AppField, FieldType, RecordQueryOptions, Value};
use pretty_assertions::assert_eq;
use tests::{expense_fields, record, tests, Setup};

async fn update_and_delete(s: &dyn Setup) {
    let engine = s.engine().await;
    let table = s.table("crud_1");
    let fields = expense_fields();
    engine.create_table(&table, &fields).await.unwrap();

    let id = engine
        .insert_record(
            &table,
            &fields,
            record([("category", "A".into()), ("note", "first".into())]),
            7,
        )
        .await
        .unwrap();

    engine
        .update_record(&table, &fields, id, record([("amount", 12.5.into())]))
        .await
        .unwrap();

    let found = engine.get_record_by_id(&table, &fields, id).await.unwrap();
    assert_eq!(found.data["amount"], Value::F64(12.5));
    // Fields absent from the update are left alone.
    assert_eq!(found.data["note"], Value::from("first"));
    assert!(found.updated_at >= found.created_at);

    engine.delete_record(&table, id).await.unwrap();

    let err = engine
        .get_record_by_id(&table, &fields, id)
        .await
        .unwrap_err();
    assert!(err.is_record_not_found());

    let err = engine.delete_record(&table, id).await.unwrap_err();
    assert!(err.is_record_not_found());

    let err = engine
        .update_record(&table, &fields, id, record([("note", "x".into())]))
        .await
        .unwrap_err();
    assert!(err.is_record_not_found());
}

async fn batch_insert_is_atomic(s: &dyn Setup) {
    let engine = s.engine().await;
    let table = s.table("crud_2");
    let fields = expense_fields();
    engine.create_table(&table, &fields).await.unwrap();

    let ids = engine
        .insert_records(
            &table,
            &fields,
            vec![
                record([("category", "A".into())]),
                record([("category", "B".into())]),
                record([("category", "C".into())]),
            ],
            1,
        )
        .await
        .unwrap();
    assert_eq!(ids.len(), 3);
    assert!(ids.windows(2).all(|w| w[0] < w[1]));

    // The third record fails validation, so nothing is written.
    let err = engine
        .insert_records(
            &table,
            &fields,
            vec![
                record([("category", "A".into())]),
                record([("category", "B".into())]),
                record([("category", "Z".into())]),
            ],
            1,
        )
        .await
        .unwrap_err();
    assert!(err.is_validation());
    assert_eq!(engine.count_records(&table).await.unwrap(), 3);

    assert!(engine
        .insert_records(&table, &fields, vec![], 1)
        .await
        .unwrap()
        .is_empty());
}

async fn batch_delete_is_all_or_nothing(s: &dyn Setup) {
    let engine = s.engine().await;
    let table = s.table("crud_3");
    let fields = expense_fields();
    engine.create_table(&table, &fields).await.unwrap();

    let ids = engine
        .insert_records(
            &table,
            &fields,
            (0..4).map(|i| record([("amount", i.into())])).collect(),
            1,
        )
        .await
        .unwrap();

    let err = engine
        .delete_records(&table, &[ids[0], ids[1], ids[3] + 1000])
        .await
        .unwrap_err();
    assert!(err.is_record_not_found());
    assert_eq!(engine.count_records(&table).await.unwrap(), 4);

    // Duplicate ids count once.
    let deleted = engine
        .delete_records(&table, &[ids[0], ids[1], ids[1]])
        .await
        .unwrap();
    assert_eq!(deleted, 2);
    assert_eq!(engine.count_records(&table).await.unwrap(), 2);
}

async fn writes_are_validated(s: &dyn Setup) {
    let engine = s.engine().await;
    let table = s.table("crud_4");
    let fields = vec![
        AppField::new("title", "Title", FieldType::Text)
            .required()
            .max_length(5),
        AppField::new("email", "Email", FieldType::Email),
        AppField::new("done", "Done", FieldType::Boolean),
        AppField::new("due", "Due", FieldType::Date),
    ];
    engine.create_table(&table, &fields).await.unwrap();

    let cases = [
        record([("email", "a@b.c".into())]),
        record([("title", Value::Null)]),
        record([("title", "toolong".into())]),
        record([("title", "ok".into()), ("email", 5.into())]),
        record([("title", "ok".into()), ("done", "maybe".into())]),
        record([("title", "ok".into()), ("due", "2024-13-40".into())]),
        record([("title", "ok".into()), ("unknown", "x".into())]),
    ];

    for data in cases {
        let err = engine
            .insert_record(&table, &fields, data.clone(), 1)
            .await
            .unwrap_err();
        assert!(err.is_validation(), "{data:?}: {err}");
    }

    let id = engine
        .insert_record(
            &table,
            &fields,
            record([
                ("title", "ok".into()),
                ("email", "a@b.c".into()),
                ("done", "true".into()),
                ("due", "2024-02-29".into()),
            ]),
            1,
        )
        .await
        .unwrap();

    let found = engine.get_record_by_id(&table, &fields, id).await.unwrap();
    assert_eq!(found.data["done"], Value::Bool(true));
    assert_eq!(
        found.data["due"],
        Value::Date(chrono::NaiveDate::from_ymd_opt(2024, 2, 29).unwrap())
    );

    // Required fields may be left out of an update but not cleared.
    let err = engine
        .update_record(&table, &fields, id, record([("title", Value::Null)]))
        .await
        .unwrap_err();
    assert!(err.is_validation());
}

async fn writes_to_missing_columns_are_not_found(s: &dyn Setup) {
    let engine = s.engine().await;
    let table = s.table("crud_6");
    let fields = expense_fields();
    engine.create_table(&table, &fields).await.unwrap();

    // `ghost` is in the field list but its column was never created.
    let mut drifted = fields.clone();
    drifted.push(AppField::new("ghost", "Ghost", FieldType::Text));

    let err = engine
        .insert_record(&table, &drifted, record([("ghost", "boo".into())]), 1)
        .await
        .unwrap_err();
    assert!(err.is_not_found(), "{err}");

    let id = engine
        .insert_record(&table, &fields, record([("note", "x".into())]), 1)
        .await
        .unwrap();
    let err = engine
        .update_record(&table, &drifted, id, record([("ghost", "boo".into())]))
        .await
        .unwrap_err();
    assert!(err.is_not_found(), "{err}");
    assert_eq!(engine.count_records(&table).await.unwrap(), 1);
}

async fn record_list_shape(s: &dyn Setup) {
    let engine = s.engine().await;
    let table = s.table("crud_5");
    let fields = expense_fields();
    engine.create_table(&table, &fields).await.unwrap();

    engine
        .insert_record(&table, &fields, record([("category", "B".into())]), 3)
        .await
        .unwrap();

    let opts = RecordQueryOptions::new();
    let (records, total) = engine.get_records(&table, &fields, &opts).await.unwrap();
    let list = dyntable::RecordListResponse::new(records, total, &opts);

    let json = serde_json::to_value(&list).unwrap();
    assert_eq!(json["pagination"]["total"], 1);
    assert_eq!(json["pagination"]["total_pages"], 1);
    assert_eq!(json["records"][0]["data"]["category"], "B");
    assert_eq!(json["records"][0]["created_by"], 3);
}

tests!(
    update_and_delete,
    batch_insert_is_atomic,
    batch_delete_is_all_or_nothing,
    writes_are_validated,
    writes_to_missing_columns_are_not_found,
    record_list_shape,
);
