use async_trait::async_trait;
use url::Url;

use crate::{DatabaseConfig, IfExists, SharePointCredentials, StrataError, Table};

/// Opens sessions against a relational database.
#[async_trait]
pub trait DatabaseConnector: Send + Sync {
    /// A stable identifier used in logs and errors (e.g. "strata-sql").
    fn name(&self) -> &'static str;

    /// Establish a session with the given parameters.
    ///
    /// # Errors
    /// Returns `Connection` if the server is unreachable or refuses the credentials.
    async fn connect(&self, config: &DatabaseConfig)
    -> Result<Box<dyn DatabaseSession>, StrataError>;
}

/// An open database session.
#[async_trait]
pub trait DatabaseSession: Send + Sync {
    /// Read every row of `table`.
    ///
    /// # Errors
    /// Returns `NotFound` for a missing table, `Query` for other statement
    /// failures and `Connection` if the session was lost.
    async fn fetch_table(&mut self, table: &str) -> Result<Table, StrataError>;

    /// Run an arbitrary read query.
    ///
    /// Default: `Unsupported`.
    async fn query(&mut self, sql: &str) -> Result<Table, StrataError> {
        let _ = sql;
        Err(StrataError::unsupported("database-query"))
    }

    /// Write `data` into `table`, returning the number of inserted rows.
    ///
    /// Default: `Unsupported`.
    async fn write_table(
        &mut self,
        table: &str,
        data: &Table,
        if_exists: IfExists,
    ) -> Result<u64, StrataError> {
        let _ = (table, data, if_exists);
        Err(StrataError::unsupported("database-write"))
    }
}

/// Authenticates against a document library.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// A stable identifier used in logs and errors (e.g. "strata-sharepoint").
    fn name(&self) -> &'static str;

    /// Authenticate and open a session for the site at `site_url`.
    ///
    /// # Errors
    /// Returns `Connection` if authentication fails or the site is unreachable.
    async fn connect(
        &self,
        credentials: &SharePointCredentials,
        site_url: &Url,
    ) -> Result<Box<dyn DocumentSession>, StrataError>;
}

/// An authenticated document library session.
#[async_trait]
pub trait DocumentSession: Send + Sync {
    /// Server-relative paths of the files directly inside `folder`.
    ///
    /// # Errors
    /// Returns `NotFound` for a missing folder.
    async fn list_folder(&self, folder: &str) -> Result<Vec<String>, StrataError>;

    /// Raw bytes of the file at `path`.
    ///
    /// # Errors
    /// Returns `NotFound` for a missing file.
    async fn open_file(&self, path: &str) -> Result<Vec<u8>, StrataError>;
}
