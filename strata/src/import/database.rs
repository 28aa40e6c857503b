use crate::Importer;
use strata_core::{DatabaseConfig, StrataError};

impl Importer {
    /// Fetch `table_names` from the database and register each one, keyed on
    /// the join column at the same position in `join_columns`.
    ///
    /// One session is opened for the whole batch. Tables are fetched in order.
    /// A table that cannot be read, or that lacks its join column, is skipped:
    /// the error is logged and kept in [`Importer::warnings`]. Returns the
    /// ordinals of the registered tables.
    ///
    /// # Errors
    /// - `InvalidArg` if the two slices differ in length.
    /// - `Unsupported` if no database connector is configured.
    /// - `Connection` if connecting fails or the connection is lost mid-batch.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "strata::importer::register_from_database",
            skip(self, config, table_names, join_columns),
            fields(host = %config.host, database = %config.database, tables = table_names.len()),
        )
    )]
    pub async fn register_from_database<T, J>(
        &mut self,
        config: &DatabaseConfig,
        table_names: &[T],
        join_columns: &[J],
    ) -> Result<Vec<usize>, StrataError>
    where
        T: AsRef<str> + Sync,
        J: AsRef<str> + Sync,
    {
        if table_names.len() != join_columns.len() {
            return Err(StrataError::InvalidArg(format!(
                "{} table names but {} join columns",
                table_names.len(),
                join_columns.len()
            )));
        }
        let connector = self
            .database
            .clone()
            .ok_or_else(|| StrataError::unsupported("database"))?;

        let mut session = connector.connect(config).await.inspect_err(|_e| {
            #[cfg(feature = "tracing")]
            tracing::warn!(connector = connector.name(), error = %_e, "database connection failed");
        })?;

        let mut ordinals = Vec::with_capacity(table_names.len());
        for (table, join) in table_names.iter().zip(join_columns) {
            let (table, join) = (table.as_ref(), join.as_ref());
            match session.fetch_table(table).await {
                Ok(data) => match self.registry.register(table, data, join) {
                    Ok(ordinal) => ordinals.push(ordinal),
                    Err(e) => self.absorb(table, e),
                },
                Err(e) if e.is_connection() => return Err(e),
                Err(e) => self.absorb(table, e),
            }
        }
        Ok(ordinals)
    }
}
