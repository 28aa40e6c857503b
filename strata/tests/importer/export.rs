use crate::helpers::{db_config, dt, keyed};
use strata::{Column, DatabaseConfig, IfExists, StrataError, Table, export_table};
use strata_mock::{DynamicMockDatabase, MockBehavior, MockDatabase, UNREACHABLE_HOST};

fn line1_rows() -> Table {
    Table::new(vec![
        Column::temporal("Timestamp", [dt(2023, 1, 1, 0, 6)]),
        Column::numeric("Temperature", [22.0]),
    ])
    .unwrap()
}

#[tokio::test]
async fn new_table_is_created() {
    let db = MockDatabase::new();
    let table = keyed("k", &[1.0, 2.0], "v", &[3.0, 4.0]);
    let rows = export_table(&db, &db_config(), "merged", &table, IfExists::Fail)
        .await
        .unwrap();
    assert_eq!(rows, 2);
    assert_eq!(db.written("merged").await, Some(table));
}

#[tokio::test]
async fn append_extends_existing_rows() {
    let db = MockDatabase::new();
    export_table(&db, &db_config(), "line1", &line1_rows(), IfExists::Append)
        .await
        .unwrap();
    let stored = db.written("line1").await.unwrap();
    assert_eq!(stored.height(), 4);
}

#[tokio::test]
async fn replace_overwrites_existing_rows() {
    let db = MockDatabase::new();
    export_table(&db, &db_config(), "line1", &line1_rows(), IfExists::Replace)
        .await
        .unwrap();
    assert_eq!(db.written("line1").await, Some(line1_rows()));
}

#[tokio::test]
async fn fail_refuses_existing_table() {
    let db = MockDatabase::new();
    let err = export_table(&db, &db_config(), "line1", &line1_rows(), IfExists::Fail)
        .await
        .unwrap_err();
    assert!(matches!(err, StrataError::Query { .. }));
    assert_eq!(db.written("line1").await, None);
}

#[tokio::test]
async fn unreachable_database_is_connection_error() {
    let db = MockDatabase::new();
    let cfg = DatabaseConfig::new("u", "p", UNREACHABLE_HOST, "plant");
    let err = export_table(&db, &cfg, "merged", &line1_rows(), IfExists::Append)
        .await
        .unwrap_err();
    assert!(err.is_connection());
}

#[tokio::test]
async fn connector_receives_mode_and_rows() {
    let (db, controller) = DynamicMockDatabase::new_with_controller("scripted");
    controller
        .set_connect_behavior(MockBehavior::Return(()))
        .await;
    export_table(db.as_ref(), &db_config(), "out", &line1_rows(), IfExists::Replace)
        .await
        .unwrap();
    let writes = controller.writes().await;
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].0, "out");
    assert_eq!(writes[0].2, IfExists::Replace);
}
