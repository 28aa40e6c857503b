//! Coercion of key values into timestamps.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

use crate::{Column, ColumnData, StrataError};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

/// Parse a textual timestamp. Offsets are converted to UTC.
///
/// ```
/// use strata_core::timeseries::parse::parse_timestamp;
///
/// let a = parse_timestamp("2023-01-01 00:02").unwrap();
/// let b = parse_timestamp("2023-01-01T01:02:00+01:00").unwrap();
/// assert_eq!(a, b);
/// assert!(parse_timestamp("yesterday").is_none());
/// ```
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|f| NaiveDate::parse_from_str(s, f).ok())
                .map(|d| d.and_time(NaiveTime::MIN))
        })
}

/// Interpret a number as nanoseconds since the Unix epoch.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub(crate) fn from_epoch_nanos(v: f64) -> Option<NaiveDateTime> {
    let nanos = v.round();
    // i64::MAX is not representable as f64; the bound below is 2^63.
    if !nanos.is_finite() || nanos < i64::MIN as f64 || nanos >= i64::MAX as f64 {
        return None;
    }
    Some(DateTime::from_timestamp_nanos(nanos as i64).naive_utc())
}

/// Read every value of `column` as a timestamp.
///
/// Nulls and blank strings stay null.
///
/// # Errors
/// Returns `TemporalParse` for the first value that cannot be read.
pub fn coerce_column(column: &Column) -> Result<Vec<Option<NaiveDateTime>>, StrataError> {
    let fail = |row: usize, value: String| StrataError::TemporalParse {
        column: column.name().to_string(),
        row,
        value,
    };
    match column.data() {
        ColumnData::Temporal(values) => Ok(values.clone()),
        ColumnData::Text(values) => values
            .iter()
            .enumerate()
            .map(|(row, v)| match v.as_deref().map(str::trim) {
                None | Some("") => Ok(None),
                Some(s) => parse_timestamp(s)
                    .map(Some)
                    .ok_or_else(|| fail(row, s.to_string())),
            })
            .collect(),
        ColumnData::Numeric(values) => values
            .iter()
            .enumerate()
            .map(|(row, v)| match v {
                None => Ok(None),
                Some(x) if x.is_nan() => Ok(None),
                Some(x) => from_epoch_nanos(*x)
                    .map(Some)
                    .ok_or_else(|| fail(row, x.to_string())),
            })
            .collect(),
    }
}
