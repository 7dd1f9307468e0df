use dyntable::{Direction, Engine, FilterItem, Operator, RecordQueryOptions, Value};
use std::collections::HashSet;
use tests::{expense_fields, record, tests, Setup};

async fn seed(engine: &Engine, table: &str, n: i64) -> Vec<i64> {
    let fields = expense_fields();
    engine.create_table(table, &fields).await.unwrap();

    let categories = ["A", "B", "C"];
    let records = (0..n)
        .map(|i| {
            record([
                ("category", categories[i as usize % 3].into()),
                ("amount", Value::I64(i * 10)),
                ("note", format!("note {i}").into()),
            ])
        })
        .collect();

    engine
        .insert_records(table, &fields, records, 1)
        .await
        .unwrap()
}

async fn pages_partition_the_table(s: &dyn Setup) {
    let engine = s.engine().await;
    let table = s.table("q_pages");
    let fields = expense_fields();
    let ids = seed(&engine, &table, 23).await;

    let mut seen = HashSet::new();
    for page in 1..=3 {
        let opts = RecordQueryOptions::new().page(page).limit(10);
        let (records, total) = engine.get_records(&table, &fields, &opts).await.unwrap();

        assert_eq!(total, 23);
        assert_eq!(records.len(), if page < 3 { 10 } else { 3 });

        for record in records {
            assert!(seen.insert(record.id.as_i64().unwrap()));
        }
    }
    assert_eq!(seen, ids.into_iter().collect());

    let opts = RecordQueryOptions::new().page(4).limit(10);
    let (records, total) = engine.get_records(&table, &fields, &opts).await.unwrap();
    assert!(records.is_empty());
    assert_eq!(total, 23);

    let opts = RecordQueryOptions::new().page(1 << 60).limit(100);
    let (records, total) = engine.get_records(&table, &fields, &opts).await.unwrap();
    assert!(records.is_empty());
    assert_eq!(total, 23);

    // Out of range options are clamped rather than rejected.
    let opts = RecordQueryOptions::new().page(0).limit(1000);
    let (records, _) = engine.get_records(&table, &fields, &opts).await.unwrap();
    assert_eq!(records.len(), 23);
}

async fn eq_filter_is_exact(s: &dyn Setup) {
    let engine = s.engine().await;
    let table = s.table("q_eq");
    let fields = expense_fields();
    seed(&engine, &table, 9).await;

    let opts = RecordQueryOptions::new().filter(FilterItem::new("category", Operator::Eq, "B"));
    let (records, total) = engine.get_records(&table, &fields, &opts).await.unwrap();

    assert_eq!(total, 3);
    assert_eq!(records.len(), 3);
    assert!(records.iter().all(|r| r.data["category"] == Value::from("B")));

    // Numbers compare numerically, whether given as JSON numbers or strings.
    for value in [serde_json::json!(40), serde_json::json!("40")] {
        let opts = RecordQueryOptions::new().filter(FilterItem::new("amount", Operator::Eq, value));
        let (records, _) = engine.get_records(&table, &fields, &opts).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].data["amount"], Value::I64(40));
    }
}

async fn combined_filters(s: &dyn Setup) {
    let engine = s.engine().await;
    let table = s.table("q_ops");
    let fields = expense_fields();
    seed(&engine, &table, 9).await;

    let count = |filters: Vec<FilterItem>| {
        let engine = engine.clone();
        let table = table.clone();
        let fields = fields.clone();
        async move {
            let mut opts = RecordQueryOptions::new();
            opts.filters = filters;
            engine.get_records(&table, &fields, &opts).await.map(|(_, total)| total)
        }
    };

    assert_eq!(
        count(vec![
            FilterItem::new("category", Operator::In, serde_json::json!(["A", "C"])),
            FilterItem::new("amount", Operator::Gte, 30),
        ])
        .await
        .unwrap(),
        4
    );
    assert_eq!(
        count(vec![FilterItem::new("category", Operator::NotIn, "A,B")])
            .await
            .unwrap(),
        3
    );
    assert_eq!(
        count(vec![FilterItem::new("note", Operator::Like, "note 1")])
            .await
            .unwrap(),
        1
    );
    assert_eq!(
        count(vec![FilterItem::new("note", Operator::NotLike, "note")])
            .await
            .unwrap(),
        0
    );
    assert_eq!(
        count(vec![
            FilterItem::new("amount", Operator::Gt, 10),
            FilterItem::new("amount", Operator::Lt, 50),
            FilterItem::new("category", Operator::Ne, "C"),
        ])
        .await
        .unwrap(),
        2
    );
    assert_eq!(
        count(vec![FilterItem::new("note", Operator::IsNull, serde_json::Value::Null)])
            .await
            .unwrap(),
        0
    );
    assert_eq!(
        count(vec![FilterItem::new("note", Operator::IsNotNull, serde_json::Value::Null)])
            .await
            .unwrap(),
        9
    );

    // Unknown fields, type mismatches and empty lists reject.
    for filter in [
        FilterItem::new("nope", Operator::Eq, 1),
        FilterItem::new("amount", Operator::Like, "1"),
        FilterItem::new("amount", Operator::Eq, "ten"),
        FilterItem::new("amount", Operator::Eq, serde_json::Value::Null),
        FilterItem::new("category", Operator::In, serde_json::Value::Null),
        FilterItem::new("category", Operator::NotIn, serde_json::Value::Null),
        FilterItem::new("category", Operator::In, ""),
        FilterItem::new("category", Operator::NotIn, serde_json::json!([])),
    ] {
        let err = count(vec![filter.clone()]).await.unwrap_err();
        assert!(err.is_validation(), "{filter:?}: {err}");
    }
}

async fn like_matches_literally(s: &dyn Setup) {
    let engine = s.engine().await;
    let table = s.table("q_like");
    let fields = expense_fields();
    engine.create_table(&table, &fields).await.unwrap();

    for note in ["100% done", "1000 done", "a_b", "axb"] {
        engine
            .insert_record(&table, &fields, record([("note", note.into())]), 1)
            .await
            .unwrap();
    }

    // Case folding is guaranteed for ASCII letters only; SQLite does not
    // fold other scripts.
    for (pattern, expected) in [
        ("0%", 1),
        ("a_b", 1),
        ("done", 2),
        ("DONE", 2),
        ("A_B", 1),
    ] {
        let opts =
            RecordQueryOptions::new().filter(FilterItem::new("note", Operator::Like, pattern));
        let (_, total) = engine.get_records(&table, &fields, &opts).await.unwrap();
        assert_eq!(total, expected, "pattern={pattern}");
    }
}

async fn sorting(s: &dyn Setup) {
    let engine = s.engine().await;
    let table = s.table("q_sort");
    let fields = expense_fields();
    let ids = seed(&engine, &table, 6).await;

    let amounts = |records: &[dyntable::RecordResponse]| {
        records
            .iter()
            .map(|r| r.data["amount"].as_i64().unwrap())
            .collect::<Vec<_>>()
    };

    let opts = RecordQueryOptions::new().sort("amount", Direction::Desc);
    let (records, _) = engine.get_records(&table, &fields, &opts).await.unwrap();
    assert_eq!(amounts(&records), vec![50, 40, 30, 20, 10, 0]);

    // Ties on the sort field are broken by ascending id.
    let opts = RecordQueryOptions::new().sort("category", Direction::Asc);
    let (records, _) = engine.get_records(&table, &fields, &opts).await.unwrap();
    assert_eq!(amounts(&records), vec![0, 30, 10, 40, 20, 50]);

    // Unknown sort keys fall back to ascending id.
    let opts = RecordQueryOptions::new().sort("f_amount; drop", Direction::Desc);
    let (records, _) = engine.get_records(&table, &fields, &opts).await.unwrap();
    let got: Vec<_> = records.iter().map(|r| r.id.as_i64().unwrap()).collect();
    assert_eq!(got, ids);

    let opts = RecordQueryOptions::new().sort("id", Direction::Desc);
    let (records, _) = engine.get_records(&table, &fields, &opts).await.unwrap();
    assert_eq!(records[0].id, Value::I64(*ids.last().unwrap()));
}

async fn removed_fields_are_not_read(s: &dyn Setup) {
    let engine = s.engine().await;
    let table = s.table("q_live");
    let mut fields = expense_fields();
    seed(&engine, &table, 2).await;

    fields.retain(|f| f.field_code != "note");
    let (records, _) = engine
        .get_records(&table, &fields, &RecordQueryOptions::new())
        .await
        .unwrap();

    assert!(records.iter().all(|r| !r.data.contains_key("note")));
    assert_eq!(
        records[0].data.keys().collect::<Vec<_>>(),
        vec!["category", "amount"]
    );
}

async fn concurrent_reads_are_isolated(s: &dyn Setup) {
    let engine = s.engine().await;
    let table = s.table("q_conc");
    let fields = expense_fields();
    seed(&engine, &table, 30).await;

    let mut tasks = vec![];
    for (i, category) in ["A", "B", "C"].into_iter().cycle().take(12).enumerate() {
        let engine = engine.clone();
        let table = table.clone();
        let fields = fields.clone();

        tasks.push(tokio::spawn(async move {
            let opts = RecordQueryOptions::new()
                .page(1 + (i as u64 % 2))
                .limit(5)
                .filter(FilterItem::new("category", Operator::Eq, category));
            let (records, total) = engine.get_records(&table, &fields, &opts).await.unwrap();
            (category, records, total)
        }));
    }

    for task in tasks {
        let (category, records, total) = task.await.unwrap();
        assert_eq!(total, 10);
        assert_eq!(records.len(), 5);
        assert!(records
            .iter()
            .all(|r| r.data["category"] == Value::from(category)));
    }
}

tests!(
    pages_partition_the_table,
    eq_filter_is_exact,
    combined_filters,
    like_matches_literally,
    sorting,
    removed_fields_are_not_read,
    concurrent_reads_are_isolated,
);
