//! Deterministic in-memory collaborators for tests and demos.
//!
//! [`MockDatabase`] and [`MockDocumentStore`] serve static fixtures and fail on
//! well-known trigger names; the [`dynamic`] module offers mocks whose behavior
//! is scripted from a controller.
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use strata_core::{
    Column, ColumnData, DatabaseConfig, DatabaseConnector, DatabaseSession, DocumentSession,
    DocumentStore, IfExists, SharePointCredentials, StrataError, Table,
};
use tokio::sync::Mutex;
use url::Url;

pub mod dynamic;
mod fixtures;

pub use dynamic::{
    DynamicDatabaseController, DynamicDocumentController, DynamicMockDatabase,
    DynamicMockDocumentStore, MockBehavior,
};
pub use fixtures::documents::{EMPTY_FOLDER, MIXED_FOLDER, SENSOR_FOLDER};

/// Host name that makes [`MockDatabase::connect`] fail.
pub const UNREACHABLE_HOST: &str = "unreachable";
/// Table name whose fetch fails with a query error.
pub const FAILING_TABLE: &str = "FAIL";
/// Table name whose fetch reports a lost connection.
pub const DISCONNECTING_TABLE: &str = "DISCONNECT";
/// Password that makes [`MockDocumentStore::connect`] fail.
pub const WRONG_PASSWORD: &str = "wrong";

/// Mock database serving the fixture tables `line1`, `line2` and `status`.
///
/// Written tables are kept in memory and shadow the fixtures.
#[derive(Default)]
pub struct MockDatabase {
    connects: AtomicUsize,
    written: Arc<Mutex<HashMap<String, Table>>>,
}

impl MockDatabase {
    /// A fresh mock with no writes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful `connect` calls so far.
    #[must_use]
    pub fn connections(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    /// A table written through a session, if any.
    pub async fn written(&self, name: &str) -> Option<Table> {
        self.written.lock().await.get(name).cloned()
    }
}

#[async_trait]
impl DatabaseConnector for MockDatabase {
    fn name(&self) -> &'static str {
        "strata-mock"
    }

    async fn connect(
        &self,
        config: &DatabaseConfig,
    ) -> Result<Box<dyn DatabaseSession>, StrataError> {
        if config.host == UNREACHABLE_HOST {
            return Err(StrataError::connection(
                "strata-mock",
                format!("cannot reach {}:{}", config.host, config.effective_port()),
            ));
        }
        self.connects.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MockDatabaseSession {
            written: Arc::clone(&self.written),
        }))
    }
}

struct MockDatabaseSession {
    written: Arc<Mutex<HashMap<String, Table>>>,
}

#[async_trait]
impl DatabaseSession for MockDatabaseSession {
    async fn fetch_table(&mut self, table: &str) -> Result<Table, StrataError> {
        match table {
            FAILING_TABLE => Err(StrataError::query(
                "strata-mock",
                format!("forced failure reading {table}"),
            )),
            DISCONNECTING_TABLE => Err(StrataError::connection(
                "strata-mock",
                "server closed the connection",
            )),
            _ => {
                if let Some(t) = self.written.lock().await.get(table) {
                    return Ok(t.clone());
                }
                fixtures::database::by_table(table)
                    .ok_or_else(|| StrataError::not_found(format!("table {table}")))
            }
        }
    }

    async fn write_table(
        &mut self,
        table: &str,
        data: &Table,
        if_exists: IfExists,
    ) -> Result<u64, StrataError> {
        let mut written = self.written.lock().await;
        let existing = written
            .get(table)
            .cloned()
            .or_else(|| fixtures::database::by_table(table));
        let merged = match (if_exists, existing) {
            (IfExists::Fail, Some(_)) => {
                return Err(StrataError::query(
                    "strata-mock",
                    format!("table {table} already exists"),
                ));
            }
            (IfExists::Append, Some(prev)) => append_rows(table, prev, data)?,
            _ => data.clone(),
        };
        written.insert(table.to_string(), merged);
        Ok(data.height() as u64)
    }
}

fn append_rows(table: &str, prev: Table, data: &Table) -> Result<Table, StrataError> {
    let prev_names: Vec<&str> = prev.column_names().collect();
    let new_names: Vec<&str> = data.column_names().collect();
    if prev_names != new_names {
        return Err(StrataError::query(
            "strata-mock",
            format!("columns of {table} do not match: {prev_names:?} vs {new_names:?}"),
        ));
    }
    let columns = prev
        .columns()
        .iter()
        .zip(data.columns())
        .map(|(old, new)| {
            let joined = match (old.data(), new.data()) {
                (ColumnData::Numeric(a), ColumnData::Numeric(b)) => {
                    ColumnData::Numeric(a.iter().chain(b).copied().collect())
                }
                (ColumnData::Text(a), ColumnData::Text(b)) => {
                    ColumnData::Text(a.iter().chain(b).cloned().collect())
                }
                (ColumnData::Temporal(a), ColumnData::Temporal(b)) => {
                    ColumnData::Temporal(a.iter().chain(b).copied().collect())
                }
                _ => {
                    return Err(StrataError::query(
                        "strata-mock",
                        format!("column {} of {table} changes type", old.name()),
                    ));
                }
            };
            Ok(Column::new(old.name(), joined))
        })
        .collect::<Result<Vec<_>, StrataError>>()?;
    Table::new(columns)
}

/// Mock document library serving fixture folders under `/sites/Telemetry`.
///
/// Records the site URL of every successful `connect` so tests can check
/// that a session is opened once.
#[derive(Default)]
pub struct MockDocumentStore {
    sites: std::sync::Mutex<Vec<Url>>,
}

impl MockDocumentStore {
    /// A fresh mock with no sessions.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful `connect` calls so far.
    #[must_use]
    pub fn connections(&self) -> usize {
        self.sites.lock().map_or(0, |s| s.len())
    }

    /// Site URLs sessions were opened for, in order.
    #[must_use]
    pub fn connected_sites(&self) -> Vec<Url> {
        self.sites.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl DocumentStore for MockDocumentStore {
    fn name(&self) -> &'static str {
        "strata-mock"
    }

    async fn connect(
        &self,
        credentials: &SharePointCredentials,
        site_url: &Url,
    ) -> Result<Box<dyn DocumentSession>, StrataError> {
        if credentials.password == WRONG_PASSWORD {
            return Err(StrataError::connection(
                "strata-mock",
                format!("authentication failed for {}", credentials.username),
            ));
        }
        if let Ok(mut sites) = self.sites.lock() {
            sites.push(site_url.clone());
        }
        Ok(Box::new(MockDocumentSession))
    }
}

struct MockDocumentSession;

#[async_trait]
impl DocumentSession for MockDocumentSession {
    async fn list_folder(&self, folder: &str) -> Result<Vec<String>, StrataError> {
        fixtures::documents::list(folder)
            .ok_or_else(|| StrataError::not_found(format!("folder {folder}")))
    }

    async fn open_file(&self, path: &str) -> Result<Vec<u8>, StrataError> {
        fixtures::documents::open(path)
            .ok_or_else(|| StrataError::not_found(format!("file {path}")))
    }
}
