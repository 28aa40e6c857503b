use std::sync::Arc;

use strata_core::{
    DatabaseConnector, DocumentSession, DocumentStore, ImporterConfig, SourceRegistry, StrataError,
    Table, Url,
};

/// The document-store session, opened on first use and kept for the
/// importer's lifetime.
pub(crate) struct OpenSession {
    pub(crate) site: Url,
    pub(crate) session: Box<dyn DocumentSession>,
}

/// Pipeline that imports tables, merges them on a shared key and resamples
/// the result.
///
/// Registrations mutate the importer in place; [`Importer::produce`] consumes
/// it, so the set of registered datasets is frozen once merging starts.
pub struct Importer {
    pub(crate) registry: SourceRegistry,
    pub(crate) database: Option<Arc<dyn DatabaseConnector>>,
    pub(crate) documents: Option<Arc<dyn DocumentStore>>,
    pub(crate) session: Option<OpenSession>,
    pub(crate) cfg: ImporterConfig,
    pub(crate) warnings: Vec<StrataError>,
}

/// Builder for constructing an [`Importer`] with custom collaborators and configuration.
pub struct ImporterBuilder {
    database: Option<Arc<dyn DatabaseConnector>>,
    documents: Option<Arc<dyn DocumentStore>>,
    cfg: ImporterConfig,
}

impl Default for ImporterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ImporterBuilder {
    /// Create a new builder with no collaborators and the default configuration.
    ///
    /// Without collaborators only [`Importer::register`] is usable; the
    /// database and document-store imports return `Unsupported`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            database: None,
            documents: None,
            cfg: ImporterConfig::default(),
        }
    }

    /// Use `connector` for [`Importer::register_from_database`].
    #[must_use]
    pub fn with_database(mut self, connector: Arc<dyn DatabaseConnector>) -> Self {
        self.database = Some(connector);
        self
    }

    /// Use `store` for folder and file imports.
    ///
    /// The store is asked for a session once, on the first folder or file
    /// import; later imports reuse that session.
    #[must_use]
    pub fn with_document_store(mut self, store: Arc<dyn DocumentStore>) -> Self {
        self.documents = Some(store);
        self
    }

    /// Replace the whole configuration.
    #[must_use]
    pub fn config(mut self, cfg: ImporterConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Name join columns are renamed to on registration (default `"Primary"`).
    #[must_use]
    pub fn primary_key(mut self, name: impl Into<String>) -> Self {
        self.cfg.primary_key = name.into();
        self
    }

    /// Field delimiter of downloaded documents (default `,`).
    #[must_use]
    pub const fn delimiter(mut self, delimiter: u8) -> Self {
        self.cfg.delimiter = delimiter;
        self
    }

    /// Build the [`Importer`].
    ///
    /// # Errors
    /// Returns `InvalidArg` if the primary key name is blank.
    pub fn build(self) -> Result<Importer, StrataError> {
        if self.cfg.primary_key.trim().is_empty() {
            return Err(StrataError::InvalidArg(
                "primary key name must not be blank".to_string(),
            ));
        }
        Ok(Importer {
            registry: SourceRegistry::new(self.cfg.primary_key.clone()),
            database: self.database,
            documents: self.documents,
            session: None,
            cfg: self.cfg,
            warnings: Vec::new(),
        })
    }
}

impl Importer {
    /// Start building a new `Importer`.
    ///
    /// ```rust,ignore
    /// use std::sync::Arc;
    /// use strata::{FillPolicy, Importer};
    ///
    /// let mut importer = Importer::builder()
    ///     .with_database(Arc::new(strata_sql::MySqlConnector::new()))
    ///     .build()?;
    /// importer
    ///     .register_from_database(&db_config, &["line1", "line2"], &["Timestamp", "Time"])
    ///     .await?;
    /// let table = importer.produce("1min", "DateTime", Some(FillPolicy::Forward))?;
    /// ```
    #[must_use]
    pub fn builder() -> ImporterBuilder {
        ImporterBuilder::new()
    }

    /// Add an already loaded dataset, renaming `join_column` to the primary key.
    ///
    /// Returns the dataset's ordinal.
    ///
    /// # Errors
    /// Returns `Schema` if `join_column` is missing or the dataset already has
    /// another column named like the primary key.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "strata::importer::register",
            skip(self, table),
            fields(rows = table.height()),
        )
    )]
    pub fn register(
        &mut self,
        label: &str,
        table: Table,
        join_column: &str,
    ) -> Result<usize, StrataError> {
        self.registry.register(label, table, join_column)
    }

    /// Datasets registered so far.
    #[must_use]
    pub const fn registered(&self) -> &SourceRegistry {
        &self.registry
    }

    /// Non-fatal problems absorbed so far (skipped tables).
    #[must_use]
    pub fn warnings(&self) -> &[StrataError] {
        &self.warnings
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &ImporterConfig {
        &self.cfg
    }

    /// Record an absorbed error.
    pub(crate) fn absorb(&mut self, label: &str, err: StrataError) {
        #[cfg(feature = "tracing")]
        tracing::warn!(dataset = label, error = %err, "skipping dataset");
        #[cfg(not(feature = "tracing"))]
        let _ = label;
        self.warnings.push(err);
    }
}
