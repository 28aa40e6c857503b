//! Decoding of headerless delimited text into tables.

use csv::{ReaderBuilder, StringRecord, Trim};

use crate::{Column, ColumnData, StrataError, Table};

/// Decode headerless delimited UTF-8 text.
///
/// - Columns are named `"0"`, `"1"`, ... by position.
/// - Fields are trimmed; empty fields are null.
/// - Rows shorter than the first row are padded with nulls.
/// - A column whose values all parse as `f64` is numeric, otherwise text.
///
/// # Errors
/// Returns `Decode` if the bytes are not UTF-8, the text is malformed, or a
/// row is longer than the first row.
pub fn decode_delimited(bytes: &[u8], label: &str, delimiter: u8) -> Result<Table, StrataError> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| StrataError::decode(label, format!("not valid UTF-8: {e}")))?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .delimiter(delimiter)
        .from_reader(text.as_bytes());

    let mut fields: Vec<Vec<Option<String>>> = Vec::new();
    let mut height = 0usize;
    let mut record = StringRecord::new();
    loop {
        let more = reader
            .read_record(&mut record)
            .map_err(|e| StrataError::decode(label, e.to_string()))?;
        if !more {
            break;
        }
        if height == 0 {
            fields = vec![Vec::new(); record.len()];
        } else if record.len() > fields.len() {
            return Err(StrataError::decode(
                label,
                format!(
                    "row {} has {} fields, expected at most {}",
                    height + 1,
                    record.len(),
                    fields.len()
                ),
            ));
        }
        for (i, values) in fields.iter_mut().enumerate() {
            let value = record.get(i).filter(|f| !f.is_empty()).map(str::to_string);
            values.push(value);
        }
        height += 1;
    }

    let columns = fields
        .into_iter()
        .enumerate()
        .map(|(i, values)| Column::new(i.to_string(), infer_column(values)))
        .collect();
    Table::new(columns)
}

fn infer_column(values: Vec<Option<String>>) -> ColumnData {
    let numbers: Option<Vec<Option<f64>>> = values
        .iter()
        .map(|v| match v {
            None => Some(None),
            Some(s) => s.parse::<f64>().ok().map(Some),
        })
        .collect();
    match numbers {
        Some(numbers) => ColumnData::Numeric(numbers),
        None => ColumnData::Text(values),
    }
}
