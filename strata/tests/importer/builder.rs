use strata::{Column, Importer, ImporterConfig, StrataError, Table};

#[test]
fn blank_primary_key_is_rejected() {
    let err = Importer::builder().primary_key("  ").build().err().expect("err");
    assert!(matches!(err, StrataError::InvalidArg(_)));
}

#[test]
fn custom_primary_key_is_used_for_registration() {
    let mut importer = Importer::builder().primary_key("Key").build().unwrap();
    let t = Table::new(vec![Column::numeric("id", [1.0])]).unwrap();
    importer.register("t", t, "id").unwrap();
    assert_eq!(importer.registered().primary_key(), "Key");
    assert!(importer.registered().get(0).unwrap().table.has_column("Key"));
}

#[test]
fn config_replaces_defaults() {
    let importer = Importer::builder()
        .config(ImporterConfig {
            primary_key: "K".into(),
            delimiter: b';',
        })
        .build()
        .unwrap();
    assert_eq!(importer.config().delimiter, b';');
    assert_eq!(importer.config().primary_key, "K");
}

#[tokio::test]
async fn imports_without_collaborators_are_unsupported() {
    let mut importer = Importer::builder().build().unwrap();
    let err = importer
        .register_from_database(&crate::helpers::db_config(), &["line1"], &["Timestamp"])
        .await
        .unwrap_err();
    assert!(matches!(err, StrataError::Unsupported { .. }));

    let err = importer
        .register_from_file(
            &crate::helpers::creds(),
            crate::helpers::PROJECT,
            &crate::helpers::url("Shared Documents/Loose/readings.csv"),
            "0",
        )
        .await
        .unwrap_err();
    assert!(matches!(err, StrataError::Unsupported { .. }));
}
