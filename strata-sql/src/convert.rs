//! Mapping of MySQL result sets onto typed tables.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use sqlx::mysql::{MySqlColumn, MySqlRow};
use sqlx::{Column as _, Row, TypeInfo};
use strata_core::{Column, ColumnData, ColumnKind, StrataError, Table};

/// How values of a MySQL column are decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlKind {
    /// Signed integers.
    Signed,
    /// Unsigned integers.
    Unsigned,
    /// `YEAR`.
    Year,
    /// `FLOAT`.
    Float,
    /// `DOUBLE`.
    Double,
    /// `DECIMAL`, read through `rust_decimal`.
    Decimal,
    /// `BOOLEAN`/`TINYINT(1)`, read as 0 or 1.
    Bool,
    /// `DATETIME` and `TIMESTAMP`.
    DateTime,
    /// `DATE`, read as midnight.
    Date,
    /// `TIME`, kept as text.
    Time,
    /// Binary strings, decoded lossily as UTF-8.
    Binary,
    /// Everything else, read as text.
    Text,
}

impl SqlKind {
    /// Column kind the decoded values land in.
    #[must_use]
    pub const fn column_kind(self) -> ColumnKind {
        match self {
            Self::Signed
            | Self::Unsigned
            | Self::Year
            | Self::Float
            | Self::Double
            | Self::Decimal
            | Self::Bool => ColumnKind::Numeric,
            Self::DateTime | Self::Date => ColumnKind::Temporal,
            Self::Time | Self::Binary | Self::Text => ColumnKind::Text,
        }
    }
}

/// Classify a MySQL type name as reported by the driver (e.g. `"INT UNSIGNED"`).
#[must_use]
pub fn classify(type_name: &str) -> SqlKind {
    let upper = type_name.trim().to_ascii_uppercase();
    let unsigned = upper.ends_with(" UNSIGNED");
    match upper.trim_end_matches(" UNSIGNED") {
        "BOOLEAN" | "BOOL" => SqlKind::Bool,
        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "INTEGER" | "BIGINT" => {
            if unsigned {
                SqlKind::Unsigned
            } else {
                SqlKind::Signed
            }
        }
        "YEAR" => SqlKind::Year,
        "FLOAT" => SqlKind::Float,
        "DOUBLE" | "REAL" => SqlKind::Double,
        "DECIMAL" | "NUMERIC" => SqlKind::Decimal,
        "DATETIME" | "TIMESTAMP" => SqlKind::DateTime,
        "DATE" => SqlKind::Date,
        "TIME" => SqlKind::Time,
        "BINARY" | "VARBINARY" | "TINYBLOB" | "BLOB" | "MEDIUMBLOB" | "LONGBLOB" | "BIT" => {
            SqlKind::Binary
        }
        _ => SqlKind::Text,
    }
}

fn gather<T>(
    rows: &[MySqlRow],
    get: impl Fn(&MySqlRow) -> Result<Option<T>, sqlx::Error>,
) -> Result<Vec<Option<T>>, sqlx::Error> {
    rows.iter().map(get).collect()
}

#[allow(clippy::cast_precision_loss)]
fn decode_column(rows: &[MySqlRow], idx: usize, kind: SqlKind) -> Result<ColumnData, sqlx::Error> {
    let data = match kind {
        SqlKind::Signed => ColumnData::Numeric(gather(rows, |r| {
            r.try_get::<Option<i64>, _>(idx).map(|v| v.map(|v| v as f64))
        })?),
        SqlKind::Unsigned => ColumnData::Numeric(gather(rows, |r| {
            r.try_get::<Option<u64>, _>(idx).map(|v| v.map(|v| v as f64))
        })?),
        SqlKind::Year => ColumnData::Numeric(gather(rows, |r| {
            r.try_get_unchecked::<Option<u16>, _>(idx)
                .map(|v| v.map(f64::from))
        })?),
        SqlKind::Float => ColumnData::Numeric(gather(rows, |r| {
            r.try_get::<Option<f32>, _>(idx).map(|v| v.map(f64::from))
        })?),
        SqlKind::Double => ColumnData::Numeric(gather(rows, |r| r.try_get::<Option<f64>, _>(idx))?),
        SqlKind::Decimal => ColumnData::Numeric(gather(rows, |r| {
            r.try_get::<Option<Decimal>, _>(idx)
                .map(|v| v.and_then(|d| d.to_f64()))
        })?),
        SqlKind::Bool => ColumnData::Numeric(gather(rows, |r| {
            r.try_get::<Option<bool>, _>(idx)
                .map(|v| v.map(|b| if b { 1.0 } else { 0.0 }))
        })?),
        SqlKind::DateTime => ColumnData::Temporal(gather(rows, |r| {
            r.try_get::<Option<NaiveDateTime>, _>(idx)
        })?),
        SqlKind::Date => ColumnData::Temporal(gather(rows, |r| {
            r.try_get::<Option<NaiveDate>, _>(idx)
                .map(|v| v.map(|d| d.and_time(NaiveTime::MIN)))
        })?),
        SqlKind::Time => ColumnData::Text(gather(rows, |r| {
            r.try_get::<Option<NaiveTime>, _>(idx)
                .map(|v| v.map(|t| t.to_string()))
        })?),
        SqlKind::Binary => ColumnData::Text(gather(rows, |r| {
            r.try_get_unchecked::<Option<Vec<u8>>, _>(idx)
                .map(|v| v.map(|b| String::from_utf8_lossy(&b).into_owned()))
        })?),
        SqlKind::Text => ColumnData::Text(gather(rows, |r| {
            r.try_get_unchecked::<Option<String>, _>(idx)
        })?),
    };
    Ok(data)
}

/// Build a table from a result set.
///
/// `columns` describes the result; it is passed separately so an empty result
/// still yields its header.
///
/// # Errors
/// Returns `Decode` if a value cannot be read as its column's type, and
/// `Schema` if the result repeats a column name.
pub fn rows_to_table(
    dataset: &str,
    columns: &[MySqlColumn],
    rows: &[MySqlRow],
) -> Result<Table, StrataError> {
    let out = columns
        .iter()
        .enumerate()
        .map(|(idx, col)| {
            let kind = classify(col.type_info().name());
            let data = decode_column(rows, idx, kind).map_err(|e| {
                StrataError::decode(dataset, format!("column {}: {e}", col.name()))
            })?;
            Ok(Column::new(col.name(), data))
        })
        .collect::<Result<Vec<_>, StrataError>>()?;
    Table::new(out).map_err(|e| StrataError::schema(dataset, e.to_string()))
}
