use dyntable::{Aggregation, ChartDataRequest, FilterItem, Operator, Value};
use pretty_assertions::assert_eq;
use tests::{expense_fields, record, tests, Setup};

async fn sum_and_count_by_category(s: &dyn Setup) {
    let engine = s.engine().await;
    let table = s.table("agg_1");
    let fields = expense_fields();
    engine.create_table(&table, &fields).await.unwrap();

    engine
        .insert_records(
            &table,
            &fields,
            vec![
                record([("category", "A".into()), ("amount", 10.into())]),
                record([("category", "B".into()), ("amount", 5.into())]),
                record([("category", "A".into()), ("amount", 20.into())]),
                // Records without a category are not charted.
                record([("amount", 100.into())]),
            ],
            1,
        )
        .await
        .unwrap();

    let req = ChartDataRequest::new("category", Aggregation::Sum, "amount");
    let chart = engine
        .get_aggregated_data(&table, &fields, &req)
        .await
        .unwrap();
    assert_eq!(chart.labels, vec!["A", "B"]);
    assert_eq!(chart.datasets.len(), 1);
    assert_eq!(chart.datasets[0].label, "Sum of Amount");
    assert_eq!(chart.datasets[0].data, vec![30.0, 5.0]);

    let chart = engine
        .get_aggregated_data(&table, &fields, &ChartDataRequest::count("category"))
        .await
        .unwrap();
    assert_eq!(chart.labels, vec!["A", "B"]);
    assert_eq!(chart.datasets[0].label, "Count");
    assert_eq!(chart.datasets[0].data, vec![2.0, 1.0]);

    let req = ChartDataRequest::new("category", Aggregation::Avg, "amount");
    let chart = engine
        .get_aggregated_data(&table, &fields, &req)
        .await
        .unwrap();
    assert_eq!(chart.datasets[0].data, vec![15.0, 5.0]);

    let req = ChartDataRequest::new("category", Aggregation::Max, "amount")
        .filter(FilterItem::new("amount", Operator::Lt, 20));
    let chart = engine
        .get_aggregated_data(&table, &fields, &req)
        .await
        .unwrap();
    assert_eq!(chart.labels, vec!["A", "B"]);
    assert_eq!(chart.datasets[0].data, vec![10.0, 5.0]);
}

async fn labels_follow_column_order(s: &dyn Setup) {
    let engine = s.engine().await;
    let table = s.table("agg_2");
    let fields = expense_fields();
    engine.create_table(&table, &fields).await.unwrap();

    for amount in [30, 4, 100, 4] {
        engine
            .insert_record(&table, &fields, record([("amount", Value::I64(amount))]), 1)
            .await
            .unwrap();
    }

    // Grouping by a number orders numerically, not lexically.
    let chart = engine
        .get_aggregated_data(&table, &fields, &ChartDataRequest::count("amount"))
        .await
        .unwrap();
    assert_eq!(chart.labels, vec!["4", "30", "100"]);
    assert_eq!(chart.datasets[0].data, vec![2.0, 1.0, 1.0]);
}

async fn empty_groups_and_null_aggregates(s: &dyn Setup) {
    let engine = s.engine().await;
    let table = s.table("agg_3");
    let fields = expense_fields();
    engine.create_table(&table, &fields).await.unwrap();

    let req = ChartDataRequest::new("category", Aggregation::Sum, "amount");
    let chart = engine
        .get_aggregated_data(&table, &fields, &req)
        .await
        .unwrap();
    assert!(chart.labels.is_empty());
    assert!(chart.datasets[0].data.is_empty());

    engine
        .insert_record(&table, &fields, record([("category", "C".into())]), 1)
        .await
        .unwrap();

    let chart = engine
        .get_aggregated_data(&table, &fields, &req)
        .await
        .unwrap();
    assert_eq!(chart.labels, vec!["C"]);
    assert_eq!(chart.datasets[0].data, vec![0.0]);
}

async fn invalid_requests(s: &dyn Setup) {
    let engine = s.engine().await;
    let table = s.table("agg_4");
    let fields = expense_fields();
    engine.create_table(&table, &fields).await.unwrap();

    for req in [
        ChartDataRequest::count(""),
        ChartDataRequest::count("missing"),
        ChartDataRequest::new("category", Aggregation::Sum, "note"),
        ChartDataRequest::new("category", Aggregation::Min, "missing"),
    ] {
        let err = engine
            .get_aggregated_data(&table, &fields, &req)
            .await
            .unwrap_err();
        assert!(err.is_validation(), "{req:?}: {err}");
    }
}

tests!(
    sum_and_count_by_category,
    labels_follow_column_order,
    empty_groups_and_null_aggregates,
    invalid_requests,
);
