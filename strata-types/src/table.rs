//! Typed, column-oriented tables passed between pipeline stages.

use std::collections::HashSet;
use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::StrataError;

/// The declared value type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// Floating point numbers (integers are widened).
    Numeric,
    /// UTF-8 strings.
    Text,
    /// Naive timestamps, interpreted as UTC.
    Temporal,
}

/// A single value read out of a table.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// Missing value.
    Null,
    /// Numeric value.
    Number(f64),
    /// Text value.
    Text(String),
    /// Timestamp value.
    Temporal(NaiveDateTime),
}

impl Cell {
    /// Returns true for `Cell::Null`.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// The column kind this value belongs to, or `None` for nulls.
    #[must_use]
    pub const fn kind(&self) -> Option<ColumnKind> {
        match self {
            Self::Null => None,
            Self::Number(_) => Some(ColumnKind::Numeric),
            Self::Text(_) => Some(ColumnKind::Text),
            Self::Temporal(_) => Some(ColumnKind::Temporal),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Number(v) => write!(f, "{}", format_number(*v)),
            Self::Text(s) => f.write_str(s),
            Self::Temporal(ts) => write!(f, "{ts}"),
        }
    }
}

/// Render integral floats without a trailing `.0` so `1.0` reads as `1`.
#[allow(clippy::cast_possible_truncation)]
fn format_number(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        v.to_string()
    }
}

/// Values of one column, tagged with their type. `None` is null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "values", rename_all = "snake_case")]
pub enum ColumnData {
    /// Numeric values.
    Numeric(Vec<Option<f64>>),
    /// Text values.
    Text(Vec<Option<String>>),
    /// Timestamp values.
    Temporal(Vec<Option<NaiveDateTime>>),
}

impl ColumnData {
    /// An all-null column of the given kind and length.
    #[must_use]
    pub fn nulls(kind: ColumnKind, len: usize) -> Self {
        match kind {
            ColumnKind::Numeric => Self::Numeric(vec![None; len]),
            ColumnKind::Text => Self::Text(vec![None; len]),
            ColumnKind::Temporal => Self::Temporal(vec![None; len]),
        }
    }

    /// Number of values (nulls included).
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Numeric(v) => v.len(),
            Self::Text(v) => v.len(),
            Self::Temporal(v) => v.len(),
        }
    }

    /// True if the column holds no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The declared kind of this column.
    #[must_use]
    pub const fn kind(&self) -> ColumnKind {
        match self {
            Self::Numeric(_) => ColumnKind::Numeric,
            Self::Text(_) => ColumnKind::Text,
            Self::Temporal(_) => ColumnKind::Temporal,
        }
    }

    /// Value at `row`, or `None` when `row` is out of bounds.
    #[must_use]
    pub fn get(&self, row: usize) -> Option<Cell> {
        let cell = match self {
            Self::Numeric(v) => v.get(row)?.map_or(Cell::Null, Cell::Number),
            Self::Text(v) => v.get(row)?.clone().map_or(Cell::Null, Cell::Text),
            Self::Temporal(v) => v.get(row)?.map_or(Cell::Null, Cell::Temporal),
        };
        Some(cell)
    }

    /// True if the value at `row` is null or out of bounds.
    #[must_use]
    pub fn is_null(&self, row: usize) -> bool {
        match self {
            Self::Numeric(v) => v.get(row).is_none_or(Option::is_none),
            Self::Text(v) => v.get(row).is_none_or(Option::is_none),
            Self::Temporal(v) => v.get(row).is_none_or(Option::is_none),
        }
    }

    /// Gather values by row index. `None` entries (and out of range indices)
    /// produce nulls.
    #[must_use]
    pub fn take(&self, indices: &[Option<usize>]) -> Self {
        match self {
            Self::Numeric(v) => Self::Numeric(
                indices
                    .iter()
                    .map(|i| i.and_then(|i| v.get(i).copied().flatten()))
                    .collect(),
            ),
            Self::Text(v) => Self::Text(
                indices
                    .iter()
                    .map(|i| i.and_then(|i| v.get(i).cloned().flatten()))
                    .collect(),
            ),
            Self::Temporal(v) => Self::Temporal(
                indices
                    .iter()
                    .map(|i| i.and_then(|i| v.get(i).copied().flatten()))
                    .collect(),
            ),
        }
    }
}

/// A named column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    name: String,
    data: ColumnData,
}

impl Column {
    /// Build a column from a name and its data.
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    /// Numeric column; accepts `f64` or `Option<f64>` items.
    pub fn numeric<I, V>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Option<f64>>,
    {
        Self::new(
            name,
            ColumnData::Numeric(values.into_iter().map(Into::into).collect()),
        )
    }

    /// Text column without nulls.
    pub fn text<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            name,
            ColumnData::Text(values.into_iter().map(|s| Some(s.into())).collect()),
        )
    }

    /// Text column with nulls.
    pub fn text_opt<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        Self::new(
            name,
            ColumnData::Text(values.into_iter().map(|s| s.map(Into::into)).collect()),
        )
    }

    /// Temporal column; accepts `NaiveDateTime` or `Option<NaiveDateTime>` items.
    pub fn temporal<I, V>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Option<NaiveDateTime>>,
    {
        Self::new(
            name,
            ColumnData::Temporal(values.into_iter().map(Into::into).collect()),
        )
    }

    /// Column name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Column values.
    #[must_use]
    pub const fn data(&self) -> &ColumnData {
        &self.data
    }

    /// Declared kind.
    #[must_use]
    pub const fn kind(&self) -> ColumnKind {
        self.data.kind()
    }

    /// Number of values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True if the column holds no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Value at `row`.
    #[must_use]
    pub fn get(&self, row: usize) -> Option<Cell> {
        self.data.get(row)
    }

    /// Split into name and data.
    #[must_use]
    pub fn into_parts(self) -> (String, ColumnData) {
        (self.name, self.data)
    }
}

/// An ordered collection of equally long, uniquely named columns.
///
/// The invariants are checked on construction and on every mutation, so a
/// `Table` in hand is always rectangular.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<Column>", into = "Vec<Column>")]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    /// Build a table, validating equal lengths and unique names.
    ///
    /// # Errors
    /// Returns `InvalidArg` if two columns share a name or differ in length.
    pub fn new(columns: Vec<Column>) -> Result<Self, StrataError> {
        let mut seen = HashSet::with_capacity(columns.len());
        for c in &columns {
            if !seen.insert(c.name()) {
                return Err(StrataError::InvalidArg(format!(
                    "duplicate column name {:?}",
                    c.name()
                )));
            }
        }
        if let Some(first) = columns.first() {
            let height = first.len();
            if let Some(bad) = columns.iter().find(|c| c.len() != height) {
                return Err(StrataError::InvalidArg(format!(
                    "column {:?} has {} values, expected {height}",
                    bad.name(),
                    bad.len()
                )));
            }
        }
        Ok(Self { columns })
    }

    /// A table with no columns and no rows.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            columns: Vec::new(),
        }
    }

    /// Number of rows.
    #[must_use]
    pub fn height(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    /// Number of columns.
    #[must_use]
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// True if the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.height() == 0
    }

    /// Columns in order.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Column names in order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.columns.iter().map(Column::name)
    }

    /// Position of the column called `name`.
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name() == name)
    }

    /// The column called `name`.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    /// True if a column called `name` exists.
    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Value at (`row`, `column`).
    #[must_use]
    pub fn cell(&self, row: usize, column: &str) -> Option<Cell> {
        self.column(column)?.get(row)
    }

    /// All values of one row, in column order.
    #[must_use]
    pub fn row(&self, row: usize) -> Option<Vec<Cell>> {
        self.columns.iter().map(|c| c.get(row)).collect()
    }

    /// Rename a column in place. Renaming a column to its own name is a no-op.
    ///
    /// # Errors
    /// Returns `InvalidArg` if `from` does not exist or `to` is already taken.
    pub fn rename_column(&mut self, from: &str, to: &str) -> Result<(), StrataError> {
        let idx = self
            .column_index(from)
            .ok_or_else(|| StrataError::InvalidArg(format!("no column named {from:?}")))?;
        if from == to {
            return Ok(());
        }
        if self.has_column(to) {
            return Err(StrataError::InvalidArg(format!(
                "cannot rename {from:?}: column {to:?} already exists"
            )));
        }
        self.columns[idx].name = to.to_string();
        Ok(())
    }

    /// Append a column.
    ///
    /// # Errors
    /// Returns `InvalidArg` on a duplicate name or a length mismatch.
    pub fn push_column(&mut self, column: Column) -> Result<(), StrataError> {
        if self.has_column(column.name()) {
            return Err(StrataError::InvalidArg(format!(
                "duplicate column name {:?}",
                column.name()
            )));
        }
        if !self.columns.is_empty() && column.len() != self.height() {
            return Err(StrataError::InvalidArg(format!(
                "column {:?} has {} values, expected {}",
                column.name(),
                column.len(),
                self.height()
            )));
        }
        self.columns.push(column);
        Ok(())
    }

    /// Consume the table, returning its columns.
    #[must_use]
    pub fn into_columns(self) -> Vec<Column> {
        self.columns
    }
}

impl TryFrom<Vec<Column>> for Table {
    type Error = StrataError;

    fn try_from(columns: Vec<Column>) -> Result<Self, Self::Error> {
        Self::new(columns)
    }
}

impl From<Table> for Vec<Column> {
    fn from(table: Table) -> Self {
        table.columns
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<Vec<String>> = self
            .columns
            .iter()
            .map(|c| {
                (0..c.len())
                    .map(|r| c.get(r).map(|v| v.to_string()).unwrap_or_default())
                    .collect()
            })
            .collect();
        let widths: Vec<usize> = self
            .columns
            .iter()
            .zip(&rendered)
            .map(|(c, vals)| {
                vals.iter()
                    .map(String::len)
                    .chain(std::iter::once(c.name().len()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let header: Vec<String> = self
            .columns
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{:<w$}", c.name()))
            .collect();
        writeln!(f, "{}", header.join("  ").trim_end())?;
        for row in 0..self.height() {
            let line: Vec<String> = rendered
                .iter()
                .zip(&widths)
                .map(|(vals, w)| format!("{:<w$}", vals[row]))
                .collect();
            writeln!(f, "{}", line.join("  ").trim_end())?;
        }
        Ok(())
    }
}
