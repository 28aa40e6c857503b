// Shared fixtures for importer tests.
#![allow(dead_code)]

use std::sync::Arc;

use strata::{Column, DatabaseConfig, Importer, SharePointCredentials, Table};
use strata_mock::{MockDatabase, MockDocumentStore};

pub const SITE: &str = "https://contoso.sharepoint.com/sites/Telemetry";
pub const PROJECT: &str = "Telemetry";

/// Full URL of a path below the Telemetry site, with spaces encoded.
pub fn url(path: &str) -> String {
    format!("{SITE}/{}", path.replace(' ', "%20"))
}

pub fn db_config() -> DatabaseConfig {
    DatabaseConfig::new("reader", "pw", "db.local", "plant")
}

pub fn creds() -> SharePointCredentials {
    SharePointCredentials::new("analyst@contoso.com", "pw", "client-id", "contoso")
}

/// Construct a naive UTC timestamp from components.
pub fn dt(y: i32, m: u32, d: u32, hh: u32, mm: u32) -> chrono::NaiveDateTime {
    chrono::NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|date| date.and_hms_opt(hh, mm, 0))
        .expect("valid test timestamp")
}

pub fn keyed(key: &str, keys: &[f64], name: &str, values: &[f64]) -> Table {
    Table::new(vec![
        Column::numeric(key, keys.iter().copied()),
        Column::numeric(name, values.iter().copied()),
    ])
    .expect("valid test table")
}

/// Importer wired to fresh static mocks, returning handles for assertions.
pub fn mocked() -> (Importer, Arc<MockDatabase>, Arc<MockDocumentStore>) {
    let db = Arc::new(MockDatabase::new());
    let docs = Arc::new(MockDocumentStore::new());
    let importer = Importer::builder()
        .with_database(db.clone())
        .with_document_store(docs.clone())
        .build()
        .expect("valid importer");
    (importer, db, docs)
}
