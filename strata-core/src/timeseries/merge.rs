use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};
use std::fmt;

use chrono::NaiveDateTime;

use super::parse::{from_epoch_nanos, parse_timestamp};
use crate::{Cell, Column, ColumnData, ColumnKind, StrataError, Table};

/// A join key value with a total order: null < numeric < temporal < text.
///
/// `-0.0` is folded into `0.0` and `NaN` is treated as null, so numeric keys
/// compare the way they look.
#[derive(Debug, Clone)]
enum JoinKey {
    Null,
    Number(f64),
    Temporal(NaiveDateTime),
    Text(String),
}

impl JoinKey {
    fn from_cell(cell: Cell) -> Self {
        match cell {
            Cell::Null => Self::Null,
            Cell::Number(v) if v.is_nan() => Self::Null,
            Cell::Number(v) if v == 0.0 => Self::Number(0.0),
            Cell::Number(v) => Self::Number(v),
            Cell::Temporal(ts) => Self::Temporal(ts),
            Cell::Text(s) => Self::Text(s),
        }
    }

    const fn rank(&self) -> u8 {
        match self {
            Self::Null => 0,
            Self::Number(_) => 1,
            Self::Temporal(_) => 2,
            Self::Text(_) => 3,
        }
    }
}

impl Ord for JoinKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a.total_cmp(b),
            (Self::Temporal(a), Self::Temporal(b)) => a.cmp(b),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for JoinKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for JoinKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for JoinKey {}

/// Kind every key is brought to before joining.
///
/// Any temporal side makes the join temporal, then numeric, then text. Columns
/// holding only nulls do not take part. With no non-null key anywhere the
/// first column's kind is kept.
fn settle_kind<'a>(columns: impl IntoIterator<Item = &'a Column>) -> Option<ColumnKind> {
    let mut first = None;
    let mut settled: Option<ColumnKind> = None;
    for col in columns {
        first.get_or_insert(col.kind());
        if (0..col.len()).all(|i| col.data().is_null(i)) {
            continue;
        }
        settled = Some(match (settled, col.kind()) {
            (Some(ColumnKind::Temporal), _) | (_, ColumnKind::Temporal) => ColumnKind::Temporal,
            (Some(ColumnKind::Numeric), _) | (_, ColumnKind::Numeric) => ColumnKind::Numeric,
            _ => ColumnKind::Text,
        });
    }
    settled.or(first)
}

/// Read one key cell as `kind`.
///
/// Text is parsed as a timestamp or a number; numbers become timestamps the
/// way the resampler reads them.
fn key_as(cell: Cell, kind: ColumnKind, dataset: &str, key: &str) -> Result<JoinKey, StrataError> {
    let mismatch = |value: &dyn fmt::Display| {
        StrataError::schema(
            dataset,
            format!("key column '{key}' value '{value}' cannot be joined as {kind:?}"),
        )
    };
    let joined = match (kind, cell) {
        (_, Cell::Null) => JoinKey::Null,
        (ColumnKind::Temporal, Cell::Temporal(ts)) => JoinKey::Temporal(ts),
        (ColumnKind::Temporal, Cell::Text(s)) => match s.trim() {
            "" => JoinKey::Null,
            t => JoinKey::Temporal(parse_timestamp(t).ok_or_else(|| mismatch(&s))?),
        },
        (ColumnKind::Temporal, Cell::Number(v)) if v.is_nan() => JoinKey::Null,
        (ColumnKind::Temporal, Cell::Number(v)) => {
            JoinKey::Temporal(from_epoch_nanos(v).ok_or_else(|| mismatch(&v))?)
        }
        (ColumnKind::Numeric, Cell::Text(s)) => match s.trim() {
            "" => JoinKey::Null,
            t => JoinKey::from_cell(Cell::Number(t.parse().map_err(|_| mismatch(&s))?)),
        },
        (ColumnKind::Numeric, cell @ Cell::Number(_))
        | (ColumnKind::Text, cell @ Cell::Text(_)) => JoinKey::from_cell(cell),
        (_, other) => return Err(mismatch(&other)),
    };
    Ok(joined)
}

/// Read the whole key column as `kind`.
fn join_keys(
    column: &Column,
    kind: ColumnKind,
    dataset: &str,
) -> Result<Vec<JoinKey>, StrataError> {
    (0..column.len())
        .map(|i| key_as(column.get(i).unwrap_or(Cell::Null), kind, dataset, column.name()))
        .collect()
}

/// Build the output key column of `kind` from sorted, distinct keys.
fn key_column(name: &str, keys: Vec<JoinKey>, kind: ColumnKind) -> Column {
    let data = match kind {
        ColumnKind::Numeric => ColumnData::Numeric(
            keys.into_iter()
                .map(|k| match k {
                    JoinKey::Number(v) => Some(v),
                    _ => None,
                })
                .collect(),
        ),
        ColumnKind::Temporal => ColumnData::Temporal(
            keys.into_iter()
                .map(|k| match k {
                    JoinKey::Temporal(ts) => Some(ts),
                    _ => None,
                })
                .collect(),
        ),
        ColumnKind::Text => ColumnData::Text(
            keys.into_iter()
                .map(|k| match k {
                    JoinKey::Text(s) => Some(s),
                    _ => None,
                })
                .collect(),
        ),
    };
    Column::new(name, data)
}

/// Full outer join of `left` and `right` on the column `key`.
///
/// - Every distinct key from either side appears once; rows are sorted by key.
/// - Keys of different kinds are brought to one kind first: text next to
///   timestamps is parsed as a timestamp, text next to numbers as a number.
/// - When a side repeats a key, its last row wins.
/// - Columns: `left`'s in order (key in place), then `right`'s non-key columns.
/// - A `right` column whose name is already taken is renamed to
///   `{name}_{ordinal}`, repeatedly until the name is free.
///
/// # Errors
/// Returns `Schema` if either side lacks `key` or a key value cannot be read
/// as the kind the join settles on.
pub fn outer_join(
    left: Table,
    right: &Table,
    key: &str,
    ordinal: usize,
) -> Result<Table, StrataError> {
    let kind = settle_kind([&left, right].into_iter().filter_map(|t| t.column(key)));
    join_as(left, right, key, ordinal, kind.unwrap_or(ColumnKind::Text))
}

fn join_as(
    left: Table,
    right: &Table,
    key: &str,
    ordinal: usize,
    kind: ColumnKind,
) -> Result<Table, StrataError> {
    let left_key = left
        .column(key)
        .ok_or_else(|| StrataError::missing_column("merged table", key))?;
    let right_label = format!("dataset #{ordinal}");
    let right_key = right
        .column(key)
        .ok_or_else(|| StrataError::missing_column(right_label.as_str(), key))?;

    let mut rows: BTreeMap<JoinKey, (Option<usize>, Option<usize>)> = BTreeMap::new();
    for (i, k) in join_keys(left_key, kind, "merged table")?.into_iter().enumerate() {
        rows.entry(k).or_default().0 = Some(i);
    }
    for (j, k) in join_keys(right_key, kind, &right_label)?.into_iter().enumerate() {
        rows.entry(k).or_default().1 = Some(j);
    }

    let mut keys = Vec::with_capacity(rows.len());
    let mut left_idx = Vec::with_capacity(rows.len());
    let mut right_idx = Vec::with_capacity(rows.len());
    for (k, (l, r)) in rows {
        keys.push(k);
        left_idx.push(l);
        right_idx.push(r);
    }

    let mut keys = Some(keys);
    let mut taken: HashSet<String> = left
        .column_names()
        .chain(right.column_names())
        .map(str::to_string)
        .collect();

    let mut out = Vec::with_capacity(left.width() + right.width().saturating_sub(1));
    for col in left.columns() {
        if col.name() == key {
            out.push(key_column(key, keys.take().unwrap_or_default(), kind));
        } else {
            out.push(Column::new(col.name(), col.data().take(&left_idx)));
        }
    }

    let left_names: HashSet<&str> = left.column_names().collect();
    for col in right.columns().iter().filter(|c| c.name() != key) {
        let mut name = col.name().to_string();
        if left_names.contains(name.as_str()) {
            while taken.contains(&name) {
                name = format!("{name}_{ordinal}");
            }
            #[cfg(feature = "tracing")]
            tracing::debug!(
                column = col.name(),
                renamed = %name,
                ordinal,
                "column name collision during merge"
            );
            taken.insert(name.clone());
        }
        out.push(Column::new(name, col.data().take(&right_idx)));
    }

    Table::new(out)
}

/// Left fold of [`outer_join`] over `tables` in order.
///
/// The key kind is settled once across all tables, so a numeric first table
/// still joins with timestamp text further down. A single table is returned
/// verbatim.
///
/// # Errors
/// Returns `EmptySource` when `tables` is empty and `Schema` if a table lacks
/// `key` or holds a key that cannot be read as the settled kind.
pub fn merge_all<I>(tables: I, key: &str) -> Result<Table, StrataError>
where
    I: IntoIterator<Item = Table>,
{
    let tables: Vec<Table> = tables.into_iter().collect();
    let kind = settle_kind(tables.iter().filter_map(|t| t.column(key)));
    let mut iter = tables.into_iter();
    let first = iter.next().ok_or(StrataError::EmptySource)?;
    let Some(kind) = kind else {
        return match iter.next() {
            None => Ok(first),
            Some(_) => Err(StrataError::missing_column("merged table", key)),
        };
    };
    iter.enumerate().try_fold(first, |acc, (i, next)| join_as(acc, &next, key, i + 1, kind))
}
