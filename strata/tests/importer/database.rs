use crate::helpers::{db_config, mocked};
use std::sync::Arc;
use strata::{Column, DatabaseConfig, Importer, StrataError, Table};
use strata_mock::{
    DISCONNECTING_TABLE, DynamicMockDatabase, FAILING_TABLE, MockBehavior, UNREACHABLE_HOST,
};

#[tokio::test]
async fn missing_table_is_skipped() {
    let (mut importer, db, _) = mocked();
    let ordinals = importer
        .register_from_database(
            &db_config(),
            &["no_such_table", "line1"],
            &["Timestamp", "Timestamp"],
        )
        .await
        .expect("partial import succeeds");

    assert_eq!(ordinals, [0]);
    assert_eq!(db.connections(), 1);
    assert_eq!(importer.registered().len(), 1);
    assert_eq!(importer.registered().get(0).unwrap().label, "line1");
    assert!(matches!(importer.warnings(), [StrataError::NotFound { .. }]));

    let table = importer.produce("1min", "DateTime", None).unwrap();
    assert!(table.has_column("Temperature"));
}

#[tokio::test]
async fn query_errors_and_missing_join_columns_are_skipped() {
    let (mut importer, _, _) = mocked();
    let ordinals = importer
        .register_from_database(
            &db_config(),
            &[FAILING_TABLE, "line2", "status"],
            &["Timestamp", "Timestamp", "Timestamp"],
        )
        .await
        .unwrap();
    // line2 keys on "Time", so it is skipped too.
    assert_eq!(ordinals, [0]);
    assert_eq!(importer.registered().get(0).unwrap().label, "status");
    assert!(matches!(
        importer.warnings(),
        [StrataError::Query { .. }, StrataError::Schema { .. }]
    ));
}

#[tokio::test]
async fn per_table_join_columns() {
    let (mut importer, _, _) = mocked();
    let ordinals = importer
        .register_from_database(&db_config(), &["line1", "line2"], &["Timestamp", "Time"])
        .await
        .unwrap();
    assert_eq!(ordinals, [0, 1]);
    assert!(importer.warnings().is_empty());
}

#[tokio::test]
async fn connection_failure_is_fatal() {
    let (mut importer, _, _) = mocked();
    let cfg = DatabaseConfig::new("reader", "pw", UNREACHABLE_HOST, "plant");
    let err = importer
        .register_from_database(&cfg, &["line1"], &["Timestamp"])
        .await
        .unwrap_err();
    assert!(err.is_connection());
    assert!(importer.registered().is_empty());
}

#[tokio::test]
async fn lost_connection_mid_batch_is_fatal() {
    let (mut importer, _, _) = mocked();
    let err = importer
        .register_from_database(
            &db_config(),
            &["line1", DISCONNECTING_TABLE, "status"],
            &["Timestamp", "Timestamp", "Timestamp"],
        )
        .await
        .unwrap_err();
    assert!(err.is_connection());
    // Tables read before the drop stay registered.
    assert_eq!(importer.registered().len(), 1);
}

#[tokio::test]
async fn length_mismatch_is_rejected_before_connecting() {
    let (mut importer, db, _) = mocked();
    let err = importer
        .register_from_database(&db_config(), &["line1", "line2"], &["Timestamp"])
        .await
        .unwrap_err();
    assert!(matches!(err, StrataError::InvalidArg(_)));
    assert_eq!(db.connections(), 0);
}

#[tokio::test]
async fn tables_are_fetched_in_order_over_one_session() {
    let (db, controller) = DynamicMockDatabase::new_with_controller("scripted");
    for name in ["a", "b", "c"] {
        let t = Table::new(vec![
            Column::numeric("k", [1.0]),
            Column::numeric(name, [2.0]),
        ])
        .unwrap();
        controller.set_table_behavior(name, MockBehavior::Return(t)).await;
    }
    let mut importer = Importer::builder()
        .with_database(Arc::clone(&db))
        .build()
        .unwrap();
    let cfg = db_config().with_port(3307);
    importer
        .register_from_database(&cfg, &["c", "a", "b"], &["k", "k", "k"])
        .await
        .unwrap();

    assert_eq!(controller.fetches().await, ["c", "a", "b"]);
    let connects = controller.connects().await;
    assert_eq!(connects.len(), 1);
    assert_eq!(connects[0].effective_port(), 3307);
    let labels: Vec<&str> = importer.registered().iter().map(|e| e.label.as_str()).collect();
    assert_eq!(labels, ["c", "a", "b"]);
}
