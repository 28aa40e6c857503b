use crate::Importer;
use strata_core::{
    FillPolicy, Frequency, ProduceReport, ResampleOutcome, StrataError, Table, merge_all, resample,
};

impl Importer {
    /// Merge every registered dataset and resample the result.
    ///
    /// Datasets are outer-joined on the primary key in registration order.
    /// The key is then renamed to `canonical_primary_name` and the table is
    /// resampled on it at `frequency` (e.g. `"17min"`). Resampling is
    /// fail-soft: a bad frequency or an unparseable key yields the merged
    /// table as is, with a warning logged.
    ///
    /// # Errors
    /// - `EmptySource` if nothing was registered.
    /// - `Schema` if another column already carries `canonical_primary_name`.
    pub fn produce(
        self,
        frequency: &str,
        canonical_primary_name: &str,
        fill_policy: Option<FillPolicy>,
    ) -> Result<Table, StrataError> {
        self.produce_report(frequency, canonical_primary_name, fill_policy)
            .map(|report| report.table)
    }

    /// Like [`Importer::produce`], also reporting whether resampling took
    /// effect and every absorbed warning.
    ///
    /// # Errors
    /// As [`Importer::produce`].
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "strata::importer::produce",
            skip(self),
            fields(datasets = self.registry.len()),
        )
    )]
    pub fn produce_report(
        self,
        frequency: &str,
        canonical_primary_name: &str,
        fill_policy: Option<FillPolicy>,
    ) -> Result<ProduceReport, StrataError> {
        let Self {
            registry,
            mut warnings,
            ..
        } = self;
        let primary = registry.primary_key().to_string();
        let mut merged = merge_all(registry.into_tables(), &primary)?;

        if canonical_primary_name != primary && merged.has_column(canonical_primary_name) {
            return Err(StrataError::schema(
                "merged table",
                format!(
                    "cannot rename {primary:?} to {canonical_primary_name:?}: that column already exists"
                ),
            ));
        }
        merged
            .rename_column(&primary, canonical_primary_name)
            .map_err(|e| StrataError::schema("merged table", e.to_string()))?;

        let outcome = match frequency.parse::<Frequency>() {
            Ok(freq) => resample(merged, canonical_primary_name, freq, fill_policy),
            Err(reason) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(frequency, error = %reason, "resampling skipped");
                ResampleOutcome::Unchanged {
                    table: merged,
                    reason,
                }
            }
        };

        let resampled = outcome.is_resampled();
        if let ResampleOutcome::Unchanged { reason, .. } = &outcome {
            warnings.push(reason.clone());
        }
        Ok(ProduceReport {
            table: outcome.into_table(),
            resampled,
            warnings,
        })
    }
}
