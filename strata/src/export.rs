use strata_core::{DatabaseConfig, DatabaseConnector, IfExists, StrataError, Table};

/// Write `table` to the database table `name`.
///
/// Opens a session with `config`, writes, and returns the number of inserted
/// rows. Failures are logged at `warn` and returned.
///
/// # Errors
/// - `Connection` if the database cannot be reached.
/// - `Query` if the table exists and `if_exists` is [`IfExists::Fail`], or the
///   write fails.
/// - `Unsupported` if the connector's sessions cannot write.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        name = "strata::export_table",
        skip(connector, config, table),
        fields(connector = connector.name(), rows = table.height()),
    )
)]
pub async fn export_table(
    connector: &dyn DatabaseConnector,
    config: &DatabaseConfig,
    name: &str,
    table: &Table,
    if_exists: IfExists,
) -> Result<u64, StrataError> {
    let result = async {
        let mut session = connector.connect(config).await?;
        session.write_table(name, table, if_exists).await
    }
    .await;
    #[cfg(feature = "tracing")]
    if let Err(e) = &result {
        tracing::warn!(table = name, error = %e, "export failed");
    }
    result
}
