use chrono::{Duration, NaiveDate, TimeZone, Utc};
use dyntable::{Engine, FixedClock, Value};
use std::sync::Arc;
use tests::{expense_fields, record, tests, Setup};

async fn midnight_rollover(s: &dyn Setup) {
    let clock = Arc::new(FixedClock::new(
        Utc.with_ymd_and_hms(2024, 5, 1, 23, 59, 0).unwrap(),
    ));
    let engine = s
        .connect(Engine::builder().clock(clock.clone()))
        .await
        .unwrap();

    let table = s.table("today_1");
    let fields = expense_fields();
    engine.create_table(&table, &fields).await.unwrap();

    let id = engine
        .insert_record(&table, &fields, record([("note", "late".into())]), 1)
        .await
        .unwrap();
    assert_eq!(engine.count_todays_updates(&table).await.unwrap(), 1);

    // Two minutes later it is a new day and nothing was updated yet.
    clock.advance(Duration::minutes(2));
    assert_eq!(engine.count_todays_updates(&table).await.unwrap(), 0);

    let may_1 = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
    assert_eq!(engine.count_updates_on(&table, may_1).await.unwrap(), 1);

    engine
        .update_record(&table, &fields, id, record([("note", Value::from("early"))]))
        .await
        .unwrap();
    assert_eq!(engine.count_todays_updates(&table).await.unwrap(), 1);
    assert_eq!(engine.count_updates_on(&table, may_1).await.unwrap(), 0);

    let found = engine.get_record_by_id(&table, &fields, id).await.unwrap();
    assert_eq!(
        found.created_at.unwrap().to_string(),
        "2024-05-01 23:59:00"
    );
    assert_eq!(
        found.updated_at.unwrap().to_string(),
        "2024-05-02 00:01:00"
    );
}

tests!(midnight_rollover);
