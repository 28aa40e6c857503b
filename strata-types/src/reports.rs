//! Report envelopes produced by the importer.

use serde::{Deserialize, Serialize};

use crate::error::StrataError;
use crate::table::Table;

/// Result of merging and resampling every registered dataset.
///
/// Carries the produced `table`, whether resampling took effect, and the
/// non-fatal warnings collected while importing and producing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ProduceReport {
    /// Merged (and, when possible, resampled) table.
    pub table: Table,
    /// False when resampling was skipped and `table` is the plain merge.
    pub resampled: bool,
    /// Non-fatal issues encountered while building the report.
    pub warnings: Vec<StrataError>,
}
