use crate::helpers::{PROJECT, creds, mocked, url};
use std::sync::Arc;
use strata::{Importer, SharePointCredentials, StrataError};
use strata_mock::{
    DynamicMockDocumentStore, EMPTY_FOLDER, MIXED_FOLDER, MockBehavior, SENSOR_FOLDER,
    WRONG_PASSWORD,
};

#[tokio::test]
async fn folder_files_are_registered_in_listing_order() {
    let (mut importer, _, docs) = mocked();
    let ordinals = importer
        .register_from_folder(&creds(), PROJECT, &url("Shared Documents/Sensors"), "0")
        .await
        .expect("folder import");

    assert_eq!(ordinals, [0, 1]);
    let labels: Vec<&str> = importer
        .registered()
        .iter()
        .map(|e| e.label.as_str())
        .collect();
    assert_eq!(
        labels,
        [
            format!("{SENSOR_FOLDER}/humidity.csv"),
            format!("{SENSOR_FOLDER}/flow.csv"),
        ]
    );
    let first = &importer.registered().get(0).unwrap().table;
    assert!(first.has_column("Primary"));
    assert!(first.has_column("1"));
    assert_eq!(docs.connections(), 1);
    assert_eq!(
        docs.connected_sites()[0].as_str(),
        "https://contoso.sharepoint.com/sites/Telemetry/"
    );
}

#[tokio::test]
async fn session_is_opened_once_across_imports() {
    let (mut importer, _, docs) = mocked();
    importer
        .register_from_folder(&creds(), PROJECT, &url("Shared Documents/Sensors"), "0")
        .await
        .unwrap();
    importer
        .register_from_file(&creds(), PROJECT, &url("Shared Documents/Loose/readings.csv"), "0")
        .await
        .unwrap();
    assert_eq!(docs.connections(), 1);
    assert_eq!(importer.registered().len(), 3);
}

#[tokio::test]
async fn session_opened_for_one_site_serves_later_imports() {
    let (store, controller) = DynamicMockDocumentStore::new_with_controller("scripted");
    controller
        .add_folder("/sites/Telemetry/Shared Documents/A", [("a.csv", "1,2\n")])
        .await;
    controller
        .add_folder("/sites/Other/Shared Documents/B", [("b.csv", "1,3\n")])
        .await;
    let mut importer = Importer::builder()
        .with_document_store(Arc::clone(&store))
        .build()
        .unwrap();

    importer
        .register_from_folder(&creds(), "Telemetry", &url("Shared Documents/A"), "0")
        .await
        .unwrap();
    importer
        .register_from_folder(
            &creds(),
            "Other",
            "https://contoso.sharepoint.com/sites/Other/Shared%20Documents/B",
            "0",
        )
        .await
        .unwrap();

    let sites = controller.sites().await;
    assert_eq!(sites.len(), 1);
    assert!(sites[0].as_str().ends_with("/sites/Telemetry/"));
    assert_eq!(importer.registered().len(), 2);
}

#[tokio::test]
async fn folder_import_is_all_or_nothing() {
    let (mut importer, _, _) = mocked();
    let err = importer
        .register_from_folder(&creds(), PROJECT, &url("Shared Documents/Mixed"), "1")
        .await
        .unwrap_err();
    assert!(matches!(err, StrataError::Schema { .. }), "got {err:?}");
    assert!(importer.registered().is_empty());
    assert!(MIXED_FOLDER.ends_with("Mixed"));
}

#[tokio::test]
async fn empty_folder_registers_nothing() {
    let (mut importer, _, _) = mocked();
    let ordinals = importer
        .register_from_folder(&creds(), PROJECT, &url("Shared Documents/Empty"), "0")
        .await
        .unwrap();
    assert!(ordinals.is_empty());
    assert!(importer.registered().is_empty());
    assert!(EMPTY_FOLDER.ends_with("Empty"));
}

#[tokio::test]
async fn missing_folder_and_file_are_not_found() {
    let (mut importer, _, _) = mocked();
    let err = importer
        .register_from_folder(&creds(), PROJECT, &url("Shared Documents/Nope"), "0")
        .await
        .unwrap_err();
    assert!(matches!(err, StrataError::NotFound { .. }));

    let err = importer
        .register_from_file(&creds(), PROJECT, &url("Shared Documents/Loose/nope.csv"), "0")
        .await
        .unwrap_err();
    assert!(matches!(err, StrataError::NotFound { .. }));
}

#[tokio::test]
async fn location_outside_project_is_invalid() {
    let (mut importer, _, docs) = mocked();
    let err = importer
        .register_from_file(&creds(), "Finance", &url("Shared Documents/Loose/readings.csv"), "0")
        .await
        .unwrap_err();
    assert!(matches!(err, StrataError::InvalidArg(_)));
    assert_eq!(docs.connections(), 0);
}

#[tokio::test]
async fn rejected_credentials_leave_no_session() {
    let (mut importer, _, docs) = mocked();
    let bad = SharePointCredentials::new(
        "analyst@contoso.com",
        WRONG_PASSWORD,
        "client-id",
        "contoso",
    );
    let err = importer
        .register_from_file(&bad, PROJECT, &url("Shared Documents/Loose/readings.csv"), "0")
        .await
        .unwrap_err();
    assert!(err.is_connection());

    // A later import with good credentials connects afresh.
    importer
        .register_from_file(&creds(), PROJECT, &url("Shared Documents/Loose/readings.csv"), "0")
        .await
        .unwrap();
    assert_eq!(docs.connections(), 1);
}

#[tokio::test]
async fn undecodable_file_is_rejected() {
    let (store, controller) = DynamicMockDocumentStore::new_with_controller("scripted");
    controller
        .set_file_behavior(
            "/sites/Telemetry/Shared Documents/bad.csv",
            MockBehavior::Return(vec![0xff, 0xfe, 0x00]),
        )
        .await;
    let mut importer = Importer::builder()
        .with_document_store(store)
        .build()
        .unwrap();
    let err = importer
        .register_from_file(&creds(), PROJECT, &url("Shared Documents/bad.csv"), "0")
        .await
        .unwrap_err();
    assert!(matches!(err, StrataError::Decode { .. }));
    assert_eq!(
        controller.opened().await,
        ["/sites/Telemetry/Shared Documents/bad.csv"]
    );
}

#[tokio::test]
async fn custom_delimiter_is_applied() {
    let (store, controller) = DynamicMockDocumentStore::new_with_controller("scripted");
    controller
        .add_folder(
            "/sites/Telemetry/Shared Documents/Semi",
            [("s.csv", "2023-01-01 00:00;4\n2023-01-01 00:01;5\n")],
        )
        .await;
    let mut importer = Importer::builder()
        .with_document_store(store)
        .delimiter(b';')
        .build()
        .unwrap();
    importer
        .register_from_folder(&creds(), PROJECT, &url("Shared Documents/Semi"), "0")
        .await
        .unwrap();
    let table = &importer.registered().get(0).unwrap().table;
    assert_eq!(table.width(), 2);
    assert_eq!(table.height(), 2);
}
