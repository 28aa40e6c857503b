use crate::helpers::{PROJECT, creds, db_config, dt, mocked, url};
use strata::{Cell, ColumnKind, FillPolicy};

#[tokio::test]
async fn database_and_folder_tables_merge_onto_one_grid() {
    let (mut importer, db, docs) = mocked();
    importer
        .register_from_database(
            &db_config(),
            &["line1", "missing", "line2"],
            &["Timestamp", "Timestamp", "Time"],
        )
        .await
        .unwrap();
    importer
        .register_from_folder(&creds(), PROJECT, &url("Shared Documents/Sensors"), "0")
        .await
        .unwrap();
    assert_eq!(db.connections(), 1);
    assert_eq!(docs.connections(), 1);
    assert_eq!(importer.warnings().len(), 1);

    let report = importer
        .produce_report("30s", "DateTime", Some(FillPolicy::Forward))
        .unwrap();
    assert!(report.resampled);
    // The skipped table is still reported.
    assert_eq!(report.warnings.len(), 1);

    let t = report.table;
    assert_eq!(
        t.column_names().collect::<Vec<_>>(),
        ["DateTime", "Temperature", "Pressure", "1", "1_3"]
    );
    assert_eq!(t.column("DateTime").unwrap().kind(), ColumnKind::Temporal);
    // 00:00 to 00:05 every 30 seconds.
    assert_eq!(t.height(), 11);
    assert_eq!(t.cell(10, "DateTime"), Some(Cell::Temporal(dt(2023, 1, 1, 0, 5))));

    // Inserted 00:00:30 row: carried from 00:00, nothing to carry for pressure.
    assert_eq!(t.cell(1, "Temperature"), Some(Cell::Number(20.5)));
    assert_eq!(t.cell(1, "Pressure"), Some(Cell::Null));
    assert_eq!(t.cell(1, "1"), Some(Cell::Number(41.0)));

    // Observed 00:01 row keeps its gap in Temperature.
    assert_eq!(t.cell(2, "Temperature"), Some(Cell::Null));
    assert_eq!(t.cell(2, "1_3"), Some(Cell::Number(7.5)));

    // Inserted 00:01:30 row skips the null at 00:01.
    assert_eq!(t.cell(3, "Temperature"), Some(Cell::Number(20.5)));
    assert_eq!(t.cell(3, "Pressure"), Some(Cell::Number(101.2)));
}

#[tokio::test]
async fn scenario_without_fill_leaves_inserted_rows_null() {
    let (mut importer, _, _) = mocked();
    importer
        .register_from_database(&db_config(), &["line1"], &["Timestamp"])
        .await
        .unwrap();
    let t = importer.produce("1min", "DateTime", None).unwrap();
    assert_eq!(t.height(), 5);
    let temps: Vec<Cell> = (0..t.height())
        .filter_map(|r| t.cell(r, "Temperature"))
        .collect();
    assert_eq!(
        temps,
        [
            Cell::Number(20.5),
            Cell::Null,
            Cell::Number(21.0),
            Cell::Null,
            Cell::Number(21.5),
        ]
    );
}

#[tokio::test]
async fn database_timestamps_and_file_text_share_rows() {
    let (mut importer, _, _) = mocked();
    importer
        .register_from_database(&db_config(), &["line1", "line2"], &["Timestamp", "Time"])
        .await
        .unwrap();
    importer
        .register_from_folder(&creds(), PROJECT, &url("Shared Documents/Sensors"), "0")
        .await
        .unwrap();

    // An unusable frequency hands back the merged table as is.
    let report = importer.produce_report("often", "DateTime", None).unwrap();
    assert!(!report.resampled);
    let t = report.table;
    assert_eq!(t.column("DateTime").unwrap().kind(), ColumnKind::Temporal);
    // 00:00 to 00:05, each minute once.
    assert_eq!(t.height(), 6);
    let stamps: Vec<Cell> = (0..t.height()).filter_map(|r| t.cell(r, "DateTime")).collect();
    let expected: Vec<Cell> = (0..6)
        .map(|m| Cell::Temporal(dt(2023, 1, 1, 0, m)))
        .collect();
    assert_eq!(stamps, expected);
    // 00:00 holds both the database reading and the file reading.
    assert_eq!(t.cell(0, "Temperature"), Some(Cell::Number(20.5)));
    assert_eq!(t.cell(0, "1"), Some(Cell::Number(41.0)));
    assert_eq!(t.cell(1, "Pressure"), Some(Cell::Number(101.2)));
    assert_eq!(t.cell(1, "1_3"), Some(Cell::Number(7.5)));
}
