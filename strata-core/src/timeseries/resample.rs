use chrono::NaiveDateTime;

use super::parse::coerce_column;
use crate::{Column, ColumnData, FillPolicy, Frequency, StrataError, Table};

/// Largest grid `try_resample` will materialize.
pub const MAX_GRID_POINTS: usize = 10_000_000;

/// Outcome of a fail-soft [`resample`].
#[derive(Debug, Clone, PartialEq)]
pub enum ResampleOutcome {
    /// The table was moved onto the regular grid.
    Resampled(Table),
    /// Resampling failed; the input is handed back untouched.
    Unchanged {
        /// The input table.
        table: Table,
        /// Why resampling was skipped.
        reason: StrataError,
    },
}

impl ResampleOutcome {
    /// The resulting table, resampled or not.
    #[must_use]
    pub fn into_table(self) -> Table {
        match self {
            Self::Resampled(table) | Self::Unchanged { table, .. } => table,
        }
    }

    /// True if the table was resampled.
    #[must_use]
    pub const fn is_resampled(&self) -> bool {
        matches!(self, Self::Resampled(_))
    }
}

/// Resample `table` onto a regular grid, returning it unchanged on failure.
///
/// See [`try_resample`] for the grid semantics. Failures are logged at `warn`
/// and reported in [`ResampleOutcome::Unchanged`].
#[must_use]
pub fn resample(
    table: Table,
    column: &str,
    frequency: Frequency,
    fill: Option<FillPolicy>,
) -> ResampleOutcome {
    match try_resample(&table, column, frequency, fill) {
        Ok(resampled) => ResampleOutcome::Resampled(resampled),
        Err(reason) => {
            #[cfg(feature = "tracing")]
            tracing::warn!(column, frequency = %frequency, error = %reason, "resampling skipped");
            ResampleOutcome::Unchanged { table, reason }
        }
    }
}

/// Resample `table` onto a regular grid keyed by `column`.
///
/// 1. `column` is coerced to timestamps; rows with a null key are dropped.
/// 2. Rows are sorted by timestamp; for duplicate timestamps the last row wins.
/// 3. The grid runs from the first to the last timestamp, inclusive, stepping
///    by `frequency`. Rows exactly on the grid keep their values. Inserted
///    rows are null, or filled per column from the nearest prior (`Forward`)
///    or following (`Backward`) non-null observation, on the grid or not.
/// 4. The timestamp column comes first, keeping the name `column`.
///
/// # Errors
/// - `Schema` if `column` is missing.
/// - `TemporalParse` if a key cannot be read as a timestamp.
/// - `InvalidArg` if the grid would exceed [`MAX_GRID_POINTS`].
pub fn try_resample(
    table: &Table,
    column: &str,
    frequency: Frequency,
    fill: Option<FillPolicy>,
) -> Result<Table, StrataError> {
    let key = table
        .column(column)
        .ok_or_else(|| StrataError::missing_column("merged table", column))?;
    let stamps = coerce_column(key)?;

    let mut observations: Vec<(NaiveDateTime, usize)> = stamps
        .into_iter()
        .enumerate()
        .filter_map(|(row, ts)| ts.map(|ts| (ts, row)))
        .collect();
    // Stable sort keeps input order among equal timestamps.
    observations.sort_by_key(|&(ts, _)| ts);
    let mut deduped: Vec<(NaiveDateTime, usize)> = Vec::with_capacity(observations.len());
    for obs in observations {
        match deduped.last_mut() {
            Some(last) if last.0 == obs.0 => *last = obs,
            _ => deduped.push(obs),
        }
    }

    let grid = build_grid(&deduped, frequency)?;

    let mut out = Vec::with_capacity(table.width());
    out.push(Column::temporal(column, grid.iter().copied().map(Some)));
    for col in table.columns().iter().filter(|c| c.name() != column) {
        let indices = gather_indices(&grid, &deduped, col.data(), fill);
        out.push(Column::new(col.name(), col.data().take(&indices)));
    }
    Table::new(out)
}

fn build_grid(
    observations: &[(NaiveDateTime, usize)],
    frequency: Frequency,
) -> Result<Vec<NaiveDateTime>, StrataError> {
    let (Some(&(start, _)), Some(&(end, _))) = (observations.first(), observations.last()) else {
        return Ok(Vec::new());
    };
    let step = frequency.as_delta();
    let too_large = || {
        StrataError::InvalidArg(format!(
            "resampling {start} to {end} every {frequency} exceeds {MAX_GRID_POINTS} rows"
        ))
    };
    let span = (end - start).num_nanoseconds().ok_or_else(too_large)?;
    let step_ns = step.num_nanoseconds().ok_or_else(too_large)?;
    let points = usize::try_from(span / step_ns)
        .ok()
        .and_then(|n| n.checked_add(1))
        .filter(|&n| n <= MAX_GRID_POINTS)
        .ok_or_else(too_large)?;

    let mut grid = Vec::with_capacity(points);
    let mut ts = start;
    for _ in 0..points {
        grid.push(ts);
        ts = ts.checked_add_signed(step).unwrap_or(ts);
    }
    Ok(grid)
}

/// Source row for every grid point of one column, `None` for null.
fn gather_indices(
    grid: &[NaiveDateTime],
    observations: &[(NaiveDateTime, usize)],
    data: &ColumnData,
    fill: Option<FillPolicy>,
) -> Vec<Option<usize>> {
    let mut indices = vec![None; grid.len()];
    match fill {
        None => {
            let mut p = 0;
            for (slot, g) in indices.iter_mut().zip(grid) {
                while p < observations.len() && observations[p].0 < *g {
                    p += 1;
                }
                if let Some(&(ts, row)) = observations.get(p) {
                    if ts == *g {
                        *slot = Some(row);
                    }
                }
            }
        }
        Some(FillPolicy::Forward) => {
            let mut p = 0;
            let mut carry = None;
            for (slot, g) in indices.iter_mut().zip(grid) {
                while p < observations.len() && observations[p].0 < *g {
                    let row = observations[p].1;
                    if !data.is_null(row) {
                        carry = Some(row);
                    }
                    p += 1;
                }
                *slot = match observations.get(p) {
                    Some(&(ts, row)) if ts == *g => Some(row),
                    _ => carry,
                };
            }
        }
        Some(FillPolicy::Backward) => {
            let mut p = observations.len();
            let mut carry = None;
            for (slot, g) in indices.iter_mut().zip(grid).rev() {
                while p > 0 && observations[p - 1].0 > *g {
                    let row = observations[p - 1].1;
                    if !data.is_null(row) {
                        carry = Some(row);
                    }
                    p -= 1;
                }
                *slot = match p.checked_sub(1).and_then(|i| observations.get(i)) {
                    Some(&(ts, row)) if ts == *g => Some(row),
                    _ => carry,
                };
            }
        }
    }
    indices
}
