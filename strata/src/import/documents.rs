use crate::Importer;
use crate::core::OpenSession;
use strata_core::{
    DocumentLocation, DocumentSession, SharePointCredentials, StrataError, Table,
    decode_delimited,
};

impl Importer {
    /// Open the document-store session unless one is already open.
    async fn ensure_session(
        &mut self,
        credentials: &SharePointCredentials,
        location: &DocumentLocation,
    ) -> Result<(), StrataError> {
        if let Some(open) = &self.session {
            if open.site != *location.site_url() {
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    session_site = %open.site,
                    requested_site = %location.site_url(),
                    "reusing document session opened for another site"
                );
            }
            return Ok(());
        }
        let store = self
            .documents
            .clone()
            .ok_or_else(|| StrataError::unsupported("document-store"))?;
        let session = store
            .connect(credentials, location.site_url())
            .await
            .inspect_err(|_e| {
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    store = store.name(),
                    error = %_e,
                    "document store connection failed"
                );
            })?;
        #[cfg(feature = "tracing")]
        tracing::info!(
            store = store.name(),
            site = %location.site_url(),
            "document session opened"
        );
        self.session = Some(OpenSession {
            site: location.site_url().clone(),
            session,
        });
        Ok(())
    }

    fn open_session(&self) -> Result<&dyn DocumentSession, StrataError> {
        self.session
            .as_ref()
            .map(|open| open.session.as_ref())
            .ok_or_else(|| StrataError::Other("document session missing after connect".into()))
    }

    /// Download one file and decode it.
    async fn load_file(
        session: &dyn DocumentSession,
        path: &str,
        delimiter: u8,
    ) -> Result<Table, StrataError> {
        let bytes = session.open_file(path).await?;
        decode_delimited(&bytes, path, delimiter)
    }

    /// Register every file directly inside a document-library folder.
    ///
    /// `folder_location` is the folder's full URL; `project` names the path
    /// segment that ends the site part of it. Files are decoded as headerless
    /// delimited text, so `join_column` is a position such as `"0"`. All files
    /// are registered or none is. An empty folder registers nothing.
    ///
    /// # Errors
    /// - `InvalidArg` if the location cannot be split at `project`.
    /// - `Unsupported` if no document store is configured.
    /// - `Connection`, `NotFound` or `Decode` from the download.
    /// - `Schema` if any file lacks `join_column`.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "strata::importer::register_from_folder",
            skip(self, credentials),
        )
    )]
    pub async fn register_from_folder(
        &mut self,
        credentials: &SharePointCredentials,
        project: &str,
        folder_location: &str,
        join_column: &str,
    ) -> Result<Vec<usize>, StrataError> {
        let location = DocumentLocation::parse(folder_location, project)?;
        self.ensure_session(credentials, &location).await?;
        let delimiter = self.cfg.delimiter;
        let session = self.open_session()?;

        let files = session
            .list_folder(location.server_relative_path())
            .await?;
        if files.is_empty() {
            #[cfg(feature = "tracing")]
            tracing::warn!(folder = location.server_relative_path(), "folder has no files");
            return Ok(Vec::new());
        }

        let mut datasets = Vec::with_capacity(files.len());
        for path in files {
            let table = Self::load_file(session, &path, delimiter).await?;
            datasets.push((path, table));
        }
        self.registry.register_all(datasets, join_column)
    }

    /// Register a single file from a document library.
    ///
    /// `file_location` is the file's full URL; see
    /// [`Importer::register_from_folder`] for the other arguments.
    ///
    /// # Errors
    /// As [`Importer::register_from_folder`].
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "strata::importer::register_from_file",
            skip(self, credentials),
        )
    )]
    pub async fn register_from_file(
        &mut self,
        credentials: &SharePointCredentials,
        project: &str,
        file_location: &str,
        join_column: &str,
    ) -> Result<usize, StrataError> {
        let location = DocumentLocation::parse(file_location, project)?;
        self.ensure_session(credentials, &location).await?;
        let path = location.server_relative_path();
        let table = Self::load_file(self.open_session()?, path, self.cfg.delimiter).await?;
        self.registry.register(path, table, join_column)
    }
}
