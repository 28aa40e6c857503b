use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use url::Url;

use strata_core::{
    DatabaseConfig, DatabaseConnector, DatabaseSession, DocumentSession, DocumentStore, IfExists,
    SharePointCredentials, StrataError, Table,
};

/// Instruction for how a method should behave for a given input.
#[derive(Clone)]
pub enum MockBehavior<T> {
    /// Return the provided value immediately.
    Return(T),
    /// Fail immediately with the provided error.
    Fail(StrataError),
    /// Hang indefinitely (simulate a stalled server).
    Hang,
}

impl<T: Clone> MockBehavior<T> {
    async fn run(self) -> Result<T, StrataError> {
        match self {
            Self::Return(v) => Ok(v),
            Self::Fail(e) => Err(e),
            Self::Hang => std::future::pending().await,
        }
    }
}

#[derive(Default)]
struct DatabaseState {
    connect_rule: Option<MockBehavior<()>>,
    table_rules: HashMap<String, MockBehavior<Table>>,
    connects: Vec<DatabaseConfig>,
    fetches: Vec<String>,
    writes: Vec<(String, Table, IfExists)>,
}

/// Controller handle used by tests to script a [`DynamicMockDatabase`].
pub struct DynamicDatabaseController {
    state: Arc<Mutex<DatabaseState>>,
}

impl DynamicDatabaseController {
    /// Set the behavior of `connect`. Unset: succeed.
    pub async fn set_connect_behavior(&self, behavior: MockBehavior<()>) {
        self.state.lock().await.connect_rule = Some(behavior);
    }

    /// Set the behavior of `fetch_table` for one table. Unset tables are not found.
    pub async fn set_table_behavior(&self, table: &str, behavior: MockBehavior<Table>) {
        self.state
            .lock()
            .await
            .table_rules
            .insert(table.to_string(), behavior);
    }

    /// Configurations passed to successful `connect` calls.
    pub async fn connects(&self) -> Vec<DatabaseConfig> {
        self.state.lock().await.connects.clone()
    }

    /// Table names passed to `fetch_table`, in call order.
    pub async fn fetches(&self) -> Vec<String> {
        self.state.lock().await.fetches.clone()
    }

    /// Tables passed to `write_table`, in call order.
    pub async fn writes(&self) -> Vec<(String, Table, IfExists)> {
        self.state.lock().await.writes.clone()
    }

    /// Clear all configured behaviors and call logs.
    pub async fn clear_all_behaviors(&self) {
        *self.state.lock().await = DatabaseState::default();
    }
}

/// A database whose behavior is scripted through a [`DynamicDatabaseController`].
pub struct DynamicMockDatabase {
    name: &'static str,
    state: Arc<Mutex<DatabaseState>>,
}

impl DynamicMockDatabase {
    /// Create a new dynamic mock database and its controller.
    #[must_use]
    pub fn new_with_controller(
        name: &'static str,
    ) -> (Arc<dyn DatabaseConnector>, DynamicDatabaseController) {
        let state = Arc::new(Mutex::new(DatabaseState::default()));
        let controller = DynamicDatabaseController {
            state: Arc::clone(&state),
        };
        let me = Arc::new(Self { name, state });
        (me as Arc<dyn DatabaseConnector>, controller)
    }
}

#[async_trait]
impl DatabaseConnector for DynamicMockDatabase {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn connect(
        &self,
        config: &DatabaseConfig,
    ) -> Result<Box<dyn DatabaseSession>, StrataError> {
        // Snapshot the behavior without holding the lock across the await.
        let behavior = self.state.lock().await.connect_rule.clone();
        if let Some(b) = behavior {
            b.run().await?;
        }
        self.state.lock().await.connects.push(config.clone());
        Ok(Box::new(DynamicDatabaseSession {
            state: Arc::clone(&self.state),
        }))
    }
}

struct DynamicDatabaseSession {
    state: Arc<Mutex<DatabaseState>>,
}

#[async_trait]
impl DatabaseSession for DynamicDatabaseSession {
    async fn fetch_table(&mut self, table: &str) -> Result<Table, StrataError> {
        let behavior = {
            let mut guard = self.state.lock().await;
            guard.fetches.push(table.to_string());
            guard.table_rules.get(table).cloned()
        };
        match behavior {
            Some(b) => b.run().await,
            None => Err(StrataError::not_found(format!("table {table}"))),
        }
    }

    async fn write_table(
        &mut self,
        table: &str,
        data: &Table,
        if_exists: IfExists,
    ) -> Result<u64, StrataError> {
        self.state
            .lock()
            .await
            .writes
            .push((table.to_string(), data.clone(), if_exists));
        Ok(data.height() as u64)
    }
}

#[derive(Default)]
struct DocumentState {
    connect_rule: Option<MockBehavior<()>>,
    folder_rules: HashMap<String, MockBehavior<Vec<String>>>,
    file_rules: HashMap<String, MockBehavior<Vec<u8>>>,
    sites: Vec<Url>,
    opened: Vec<String>,
}

/// Controller handle used by tests to script a [`DynamicMockDocumentStore`].
pub struct DynamicDocumentController {
    state: Arc<Mutex<DocumentState>>,
}

impl DynamicDocumentController {
    /// Set the behavior of `connect`. Unset: succeed.
    pub async fn set_connect_behavior(&self, behavior: MockBehavior<()>) {
        self.state.lock().await.connect_rule = Some(behavior);
    }

    /// Set the listing returned for `folder`.
    pub async fn set_folder_behavior(&self, folder: &str, behavior: MockBehavior<Vec<String>>) {
        self.state
            .lock()
            .await
            .folder_rules
            .insert(folder.to_string(), behavior);
    }

    /// Set the bytes returned for `path`.
    pub async fn set_file_behavior(&self, path: &str, behavior: MockBehavior<Vec<u8>>) {
        self.state
            .lock()
            .await
            .file_rules
            .insert(path.to_string(), behavior);
    }

    /// Register a folder of files in one go: listing plus contents.
    pub async fn add_folder<'a, I>(&self, folder: &str, files: I)
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut guard = self.state.lock().await;
        let mut listing = Vec::new();
        for (name, body) in files {
            let path = format!("{}/{name}", folder.trim_end_matches('/'));
            guard
                .file_rules
                .insert(path.clone(), MockBehavior::Return(body.as_bytes().to_vec()));
            listing.push(path);
        }
        guard
            .folder_rules
            .insert(folder.trim_end_matches('/').to_string(), MockBehavior::Return(listing));
    }

    /// Site URLs passed to successful `connect` calls.
    pub async fn sites(&self) -> Vec<Url> {
        self.state.lock().await.sites.clone()
    }

    /// Paths passed to `open_file`, in call order.
    pub async fn opened(&self) -> Vec<String> {
        self.state.lock().await.opened.clone()
    }
}

/// A document store whose behavior is scripted through a [`DynamicDocumentController`].
pub struct DynamicMockDocumentStore {
    name: &'static str,
    state: Arc<Mutex<DocumentState>>,
}

impl DynamicMockDocumentStore {
    /// Create a new dynamic mock document store and its controller.
    #[must_use]
    pub fn new_with_controller(
        name: &'static str,
    ) -> (Arc<dyn DocumentStore>, DynamicDocumentController) {
        let state = Arc::new(Mutex::new(DocumentState::default()));
        let controller = DynamicDocumentController {
            state: Arc::clone(&state),
        };
        let me = Arc::new(Self { name, state });
        (me as Arc<dyn DocumentStore>, controller)
    }
}

#[async_trait]
impl DocumentStore for DynamicMockDocumentStore {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn connect(
        &self,
        _credentials: &SharePointCredentials,
        site_url: &Url,
    ) -> Result<Box<dyn DocumentSession>, StrataError> {
        let behavior = self.state.lock().await.connect_rule.clone();
        if let Some(b) = behavior {
            b.run().await?;
        }
        self.state.lock().await.sites.push(site_url.clone());
        Ok(Box::new(DynamicDocumentSession {
            state: Arc::clone(&self.state),
        }))
    }
}

struct DynamicDocumentSession {
    state: Arc<Mutex<DocumentState>>,
}

#[async_trait]
impl DocumentSession for DynamicDocumentSession {
    async fn list_folder(&self, folder: &str) -> Result<Vec<String>, StrataError> {
        let behavior = self
            .state
            .lock()
            .await
            .folder_rules
            .get(folder.trim_end_matches('/'))
            .cloned();
        match behavior {
            Some(b) => b.run().await,
            None => Err(StrataError::not_found(format!("folder {folder}"))),
        }
    }

    async fn open_file(&self, path: &str) -> Result<Vec<u8>, StrataError> {
        let behavior = {
            let mut guard = self.state.lock().await;
            guard.opened.push(path.to_string());
            guard.file_rules.get(path).cloned()
        };
        match behavior {
            Some(b) => b.run().await,
            None => Err(StrataError::not_found(format!("file {path}"))),
        }
    }
}
