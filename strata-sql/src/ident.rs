//! Identifier quoting and DDL text.

use strata_core::{ColumnKind, StrataError, Table};

/// Quote `name` as a MySQL identifier, doubling embedded backticks.
///
/// # Errors
/// Returns `InvalidArg` for an empty name or one containing NUL.
pub fn quote_ident(name: &str) -> Result<String, StrataError> {
    if name.is_empty() || name.contains('\0') {
        return Err(StrataError::InvalidArg(format!(
            "invalid SQL identifier {name:?}"
        )));
    }
    Ok(format!("`{}`", name.replace('`', "``")))
}

/// Column type used when creating a table for `kind`.
pub const fn sql_type(kind: ColumnKind) -> &'static str {
    match kind {
        ColumnKind::Numeric => "DOUBLE",
        ColumnKind::Text => "TEXT",
        ColumnKind::Temporal => "DATETIME(6)",
    }
}

/// `CREATE TABLE` statement matching the columns of `data`.
pub fn create_table(table: &str, data: &Table) -> Result<String, StrataError> {
    let columns = data
        .columns()
        .iter()
        .map(|c| Ok(format!("{} {} NULL", quote_ident(c.name())?, sql_type(c.kind()))))
        .collect::<Result<Vec<_>, StrataError>>()?;
    Ok(format!(
        "CREATE TABLE {} ({})",
        quote_ident(table)?,
        columns.join(", ")
    ))
}

/// `INSERT INTO t (a, b) ` prefix; values are appended by the caller.
pub fn insert_prefix(table: &str, data: &Table) -> Result<String, StrataError> {
    let names = data
        .column_names()
        .map(quote_ident)
        .collect::<Result<Vec<_>, StrataError>>()?;
    Ok(format!(
        "INSERT INTO {} ({}) ",
        quote_ident(table)?,
        names.join(", ")
    ))
}
