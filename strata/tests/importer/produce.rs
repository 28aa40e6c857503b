use crate::helpers::{dt, keyed};
use strata::{Cell, Column, FillPolicy, Importer, StrataError, Table};

fn importer() -> Importer {
    Importer::builder().build().unwrap()
}

#[test]
fn nothing_registered_is_empty_source() {
    let err = importer().produce("1min", "DateTime", None).unwrap_err();
    assert_eq!(err, StrataError::EmptySource);
}

#[test]
fn single_dataset_is_renamed_and_resampled() {
    let mut imp = importer();
    let t = Table::new(vec![
        Column::text("ts", ["2023-01-01 00:00", "2023-01-01 00:02"]),
        Column::numeric("v", [1.0, 3.0]),
    ])
    .unwrap();
    imp.register("t", t, "ts").unwrap();
    let out = imp.produce("1min", "DateTime", None).unwrap();

    assert_eq!(out.column_names().collect::<Vec<_>>(), ["DateTime", "v"]);
    assert_eq!(out.height(), 3);
    assert_eq!(out.cell(1, "DateTime"), Some(Cell::Temporal(dt(2023, 1, 1, 0, 1))));
    assert_eq!(out.cell(1, "v"), Some(Cell::Null));
    assert_eq!(out.cell(2, "v"), Some(Cell::Number(3.0)));
}

#[test]
fn forward_fill_carries_values() {
    let mut imp = importer();
    let t = Table::new(vec![
        Column::text("ts", ["2023-01-01 00:00", "2023-01-01 00:03"]),
        Column::numeric("v", [1.0, 4.0]),
    ])
    .unwrap();
    imp.register("t", t, "ts").unwrap();
    let out = imp
        .produce("1min", "DateTime", Some(FillPolicy::Forward))
        .unwrap();
    let values: Vec<Cell> = (0..out.height()).filter_map(|r| out.cell(r, "v")).collect();
    assert_eq!(
        values,
        [
            Cell::Number(1.0),
            Cell::Number(1.0),
            Cell::Number(1.0),
            Cell::Number(4.0)
        ]
    );
}

#[test]
fn backward_fill_uses_next_value() {
    let mut imp = importer();
    let t = Table::new(vec![
        Column::text("ts", ["2023-01-01 00:00", "2023-01-01 00:02"]),
        Column::numeric("v", [1.0, 3.0]),
    ])
    .unwrap();
    imp.register("t", t, "ts").unwrap();
    let out = imp
        .produce("1min", "DateTime", Some(FillPolicy::Backward))
        .unwrap();
    assert_eq!(out.cell(1, "v"), Some(Cell::Number(3.0)));
}

#[test]
fn canonical_name_clashing_with_data_column_is_schema_error() {
    let mut imp = importer();
    imp.register("t", keyed("k", &[1.0], "DateTime", &[2.0]), "k")
        .unwrap();
    let err = imp.produce("1min", "DateTime", None).unwrap_err();
    assert!(matches!(err, StrataError::Schema { .. }));
}

#[test]
fn canonical_name_may_equal_primary() {
    let mut imp = importer();
    imp.register(
        "t",
        Table::new(vec![Column::text("k", ["2023-01-01"])]).unwrap(),
        "k",
    )
    .unwrap();
    let out = imp.produce("1D", "Primary", None).unwrap();
    assert_eq!(out.column_names().collect::<Vec<_>>(), ["Primary"]);
}

#[test]
fn bad_frequency_returns_merged_table_with_warning() {
    let mut imp = importer();
    imp.register("a", keyed("k", &[2.0, 1.0], "x", &[20.0, 10.0]), "k")
        .unwrap();
    imp.register("b", keyed("k", &[3.0], "y", &[30.0]), "k")
        .unwrap();
    let report = imp.produce_report("fortnightly", "Id", None).unwrap();

    assert!(!report.resampled);
    assert!(matches!(
        report.warnings.as_slice(),
        [StrataError::InvalidFrequency(_)]
    ));
    let t = report.table;
    assert_eq!(t.column_names().collect::<Vec<_>>(), ["Id", "x", "y"]);
    assert_eq!(t.height(), 3);
    // Merged rows are ordered by key.
    assert_eq!(t.cell(0, "Id"), Some(Cell::Number(1.0)));
    assert_eq!(t.cell(2, "y"), Some(Cell::Number(30.0)));
    assert_eq!(t.cell(2, "x"), Some(Cell::Null));
}

#[test]
fn unparseable_key_returns_merged_table() {
    let mut imp = importer();
    let t = Table::new(vec![
        Column::text("k", ["north", "south"]),
        Column::numeric("v", [1.0, 2.0]),
    ])
    .unwrap();
    imp.register("t", t.clone(), "k").unwrap();
    let report = imp.produce_report("1h", "Site", None).unwrap();
    assert!(!report.resampled);
    assert!(matches!(
        report.warnings.as_slice(),
        [StrataError::TemporalParse { .. }]
    ));
    assert_eq!(report.table.height(), 2);
    assert_eq!(report.table.cell(1, "Site"), Some(Cell::Text("south".into())));
}

#[test]
fn colliding_columns_get_dataset_suffix() {
    let mut imp = importer();
    for _ in 0..3 {
        imp.register(
            "t",
            Table::new(vec![
                Column::text("ts", ["2023-01-01 00:00"]),
                Column::numeric("value", [1.0]),
            ])
            .unwrap(),
            "ts",
        )
        .unwrap();
    }
    let out = imp.produce("1min", "DateTime", None).unwrap();
    assert_eq!(
        out.column_names().collect::<Vec<_>>(),
        ["DateTime", "value", "value_1", "value_2"]
    );
}

#[test]
fn numeric_keys_are_read_as_epoch_nanoseconds() {
    let mut imp = importer();
    imp.register("t", keyed("k", &[0.0, 120e9], "v", &[1.0, 2.0]), "k")
        .unwrap();
    let report = imp.produce_report("1min", "Epoch", None).unwrap();
    assert!(report.resampled);
    assert!(report.warnings.is_empty());
    assert_eq!(report.table.height(), 3);
    assert_eq!(
        report.table.cell(2, "Epoch"),
        Some(Cell::Temporal(dt(1970, 1, 1, 0, 2)))
    );
}

#[test]
fn small_integer_keys_land_on_a_nanosecond_grid() {
    let mut imp = importer();
    imp.register("a", keyed("k", &[1.0, 2.0, 3.0], "A", &[10.0, 20.0, 30.0]), "k")
        .unwrap();
    imp.register("b", keyed("k", &[2.0, 3.0, 4.0], "B", &[200.0, 300.0, 400.0]), "k")
        .unwrap();
    let report = imp.produce_report("1ns", "Primary", None).unwrap();
    assert!(report.resampled);
    let t = report.table;
    assert_eq!(t.height(), 4);
    assert_eq!(
        t.cell(0, "Primary"),
        Some(Cell::Temporal(chrono::DateTime::from_timestamp_nanos(1).naive_utc()))
    );
    assert_eq!(t.cell(3, "A"), Some(Cell::Null));
    assert_eq!(t.cell(0, "B"), Some(Cell::Null));
}
