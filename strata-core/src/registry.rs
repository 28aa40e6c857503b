use crate::{StrataError, Table};

/// A dataset accepted into the registry.
#[derive(Debug, Clone, PartialEq)]
pub struct RegisteredSource {
    /// Position in registration order, starting at 0.
    pub ordinal: usize,
    /// Table name or file path the dataset came from.
    pub label: String,
    /// The dataset, with its join column renamed to the primary key.
    pub table: Table,
}

/// Append-only store of datasets normalized to a shared join key.
///
/// Ordinals are contiguous from 0 and `len()` is always the next ordinal.
/// There is no removal or reordering.
#[derive(Debug, Clone)]
pub struct SourceRegistry {
    primary: String,
    entries: Vec<RegisteredSource>,
}

impl SourceRegistry {
    /// An empty registry whose datasets are keyed on `primary`.
    pub fn new(primary: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            entries: Vec::new(),
        }
    }

    /// Name every registered dataset's join column is renamed to.
    #[must_use]
    pub fn primary_key(&self) -> &str {
        &self.primary
    }

    /// Rename `join_column` to the primary key and append the dataset.
    ///
    /// Returns the ordinal assigned to it.
    ///
    /// # Errors
    /// Returns `Schema` if `join_column` is absent or if the dataset already
    /// has a different column carrying the primary key's name.
    pub fn register(
        &mut self,
        label: impl Into<String>,
        table: Table,
        join_column: &str,
    ) -> Result<usize, StrataError> {
        let label = label.into();
        let table = self.normalize(&label, table, join_column)?;
        Ok(self.push(label, table))
    }

    /// Register several datasets with the same join column, all or nothing.
    ///
    /// Every dataset is validated before any is appended, so on error the
    /// registry is left as it was. Returns the assigned ordinals.
    ///
    /// # Errors
    /// Returns the first `Schema` error encountered.
    pub fn register_all<I, S>(
        &mut self,
        datasets: I,
        join_column: &str,
    ) -> Result<Vec<usize>, StrataError>
    where
        I: IntoIterator<Item = (S, Table)>,
        S: Into<String>,
    {
        let normalized = datasets
            .into_iter()
            .map(|(label, table)| {
                let label = label.into();
                self.normalize(&label, table, join_column)
                    .map(|table| (label, table))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(normalized
            .into_iter()
            .map(|(label, table)| self.push(label, table))
            .collect())
    }

    fn normalize(
        &self,
        label: &str,
        mut table: Table,
        join_column: &str,
    ) -> Result<Table, StrataError> {
        if !table.has_column(join_column) {
            return Err(StrataError::missing_column(label, join_column));
        }
        if join_column != self.primary && table.has_column(&self.primary) {
            return Err(StrataError::schema(
                label,
                format!(
                    "join column {join_column:?} cannot become {:?}: that column already exists",
                    self.primary
                ),
            ));
        }
        table
            .rename_column(join_column, &self.primary)
            .map_err(|e| StrataError::schema(label, e.to_string()))?;
        Ok(table)
    }

    fn push(&mut self, label: String, table: Table) -> usize {
        let ordinal = self.entries.len();
        #[cfg(feature = "tracing")]
        tracing::debug!(
            ordinal,
            label = %label,
            rows = table.height(),
            columns = table.width(),
            "registered dataset"
        );
        self.entries.push(RegisteredSource {
            ordinal,
            label,
            table,
        });
        ordinal
    }

    /// Number of registered datasets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The dataset with the given ordinal.
    #[must_use]
    pub fn get(&self, ordinal: usize) -> Option<&RegisteredSource> {
        self.entries.get(ordinal)
    }

    /// Registered datasets in ordinal order.
    pub fn iter(&self) -> impl Iterator<Item = &RegisteredSource> + '_ {
        self.entries.iter()
    }

    /// Consume the registry, returning the tables in ordinal order.
    #[must_use]
    pub fn into_tables(self) -> Vec<Table> {
        self.entries.into_iter().map(|e| e.table).collect()
    }
}
