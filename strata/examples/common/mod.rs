#![allow(dead_code)]

use std::sync::Arc;
use strata::{DatabaseConfig, DatabaseConnector, DocumentStore, SharePointCredentials};

/// True when demos should run against the in-memory mocks.
pub fn use_mock() -> bool {
    std::env::var("STRATA_EXAMPLES_USE_MOCK").is_ok()
}

#[must_use]
pub fn get_database() -> Arc<dyn DatabaseConnector> {
    if use_mock() {
        println!("--- (Using mock database) ---");
        Arc::new(strata_mock::MockDatabase::new())
    } else {
        Arc::new(strata_sql::MySqlConnector::new())
    }
}

#[must_use]
pub fn get_document_store() -> Arc<dyn DocumentStore> {
    if use_mock() {
        println!("--- (Using mock document store) ---");
        Arc::new(strata_mock::MockDocumentStore::new())
    } else {
        Arc::new(strata_sharepoint::SharePointStore::new())
    }
}

pub fn database_config() -> Result<DatabaseConfig, strata::StrataError> {
    if use_mock() {
        return Ok(DatabaseConfig::new("demo", "demo", "localhost", "plant"));
    }
    strata::env::database_config()
}

pub fn sharepoint_credentials() -> Result<SharePointCredentials, strata::StrataError> {
    if use_mock() {
        return Ok(SharePointCredentials::new("demo@contoso.com", "demo", "demo", "contoso"));
    }
    strata::env::sharepoint_credentials()
}

/// Install a fmt subscriber honoring `RUST_LOG` (default `info`).
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();
}
