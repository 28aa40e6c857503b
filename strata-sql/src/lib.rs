//! strata-sql
//!
//! MySQL connector implementing the `strata_core` database traits on top of
//! `sqlx`. Tables are read with `SELECT *` and mapped column by column onto
//! typed tables; writes create the target table from the column kinds.
#![warn(missing_docs)]

/// Result-set decoding.
pub mod convert;
/// Identifier quoting and DDL text.
pub mod ident;

use std::time::Duration;

use async_trait::async_trait;
use sqlx::mysql::{MySql, MySqlConnectOptions, MySqlPool, MySqlPoolOptions};
use sqlx::{Executor, QueryBuilder, Row};
use strata_core::{
    ColumnData, DatabaseConfig, DatabaseConnector, DatabaseSession, IfExists, StrataError, Table,
};

/// Bind parameters allowed in one MySQL statement.
const MAX_BIND_PARAMS: usize = 65_535;

/// Connector for MySQL-compatible servers.
#[derive(Debug, Clone)]
pub struct MySqlConnector {
    max_connections: u32,
    acquire_timeout: Duration,
}

impl Default for MySqlConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl MySqlConnector {
    /// Identifier used in logs and errors.
    pub const KEY: &'static str = "strata-sql";

    /// A connector opening one connection per session, waiting up to 30 s for it.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_connections: 1,
            acquire_timeout: Duration::from_secs(30),
        }
    }

    /// Size of each session's connection pool.
    #[must_use]
    pub const fn with_max_connections(mut self, n: u32) -> Self {
        self.max_connections = n;
        self
    }

    /// How long to wait for a connection before failing.
    #[must_use]
    pub const fn with_acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }

    fn options(config: &DatabaseConfig) -> MySqlConnectOptions {
        MySqlConnectOptions::new()
            .host(&config.host)
            .port(config.effective_port())
            .username(&config.username)
            .password(&config.password)
            .database(&config.database)
    }
}

/// Map a driver error onto the shared error type.
///
/// `what` names the object the statement was about, e.g. the table.
#[must_use]
pub fn normalize_error(e: &sqlx::Error, what: &str) -> StrataError {
    match e {
        sqlx::Error::Database(db) => match db.code().as_deref() {
            // ER_NO_SUCH_TABLE
            Some("42S02") => StrataError::not_found(format!("table {what}")),
            Some(code) if code.starts_with("08") || code == "28000" => {
                StrataError::connection(MySqlConnector::KEY, db.message())
            }
            _ => StrataError::query(MySqlConnector::KEY, format!("{what}: {}", db.message())),
        },
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::Protocol(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => StrataError::connection(MySqlConnector::KEY, e.to_string()),
        sqlx::Error::RowNotFound => StrataError::not_found(what.to_string()),
        sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::TypeNotFound { .. } => StrataError::decode(what, e.to_string()),
        _ => StrataError::query(MySqlConnector::KEY, format!("{what}: {e}")),
    }
}

#[async_trait]
impl DatabaseConnector for MySqlConnector {
    fn name(&self) -> &'static str {
        Self::KEY
    }

    async fn connect(
        &self,
        config: &DatabaseConfig,
    ) -> Result<Box<dyn DatabaseSession>, StrataError> {
        let pool = MySqlPoolOptions::new()
            .max_connections(self.max_connections)
            .acquire_timeout(self.acquire_timeout)
            .connect_with(Self::options(config))
            .await
            .map_err(|e| {
                StrataError::connection(
                    Self::KEY,
                    format!(
                        "{}@{}:{}/{}: {e}",
                        config.username,
                        config.host,
                        config.effective_port(),
                        config.database
                    ),
                )
            })?;
        #[cfg(feature = "tracing")]
        tracing::debug!(host = %config.host, database = %config.database, "mysql session opened");
        Ok(Box::new(MySqlSession { pool }))
    }
}

/// An open MySQL session.
pub struct MySqlSession {
    pool: MySqlPool,
}

impl MySqlSession {
    async fn read(&self, sql: &str, dataset: &str) -> Result<Table, StrataError> {
        let rows = sqlx::query(sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| normalize_error(&e, dataset))?;
        if let Some(first) = rows.first() {
            return convert::rows_to_table(dataset, first.columns(), &rows);
        }
        // No rows: take the header from the statement description.
        let described = (&self.pool)
            .describe(sql)
            .await
            .map_err(|e| normalize_error(&e, dataset))?;
        convert::rows_to_table(dataset, described.columns(), &[])
    }

    async fn table_exists(&self, table: &str) -> Result<bool, StrataError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM information_schema.tables \
             WHERE table_schema = DATABASE() AND table_name = ?",
        )
        .bind(table)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| normalize_error(&e, table))?;
        Ok(count > 0)
    }

    async fn execute(&self, sql: &str, what: &str) -> Result<(), StrataError> {
        sqlx::query(sql)
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(|e| normalize_error(&e, what))
    }

    async fn insert_rows(&self, table: &str, data: &Table) -> Result<u64, StrataError> {
        let prefix = ident::insert_prefix(table, data)?;
        let chunk = (MAX_BIND_PARAMS / data.width().max(1)).max(1);
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| normalize_error(&e, table))?;
        let mut inserted = 0;
        let mut start = 0;
        while start < data.height() {
            let end = (start + chunk).min(data.height());
            let mut qb = QueryBuilder::<MySql>::new(&prefix);
            qb.push_values(start..end, |mut b, row| {
                for column in data.columns() {
                    match column.data() {
                        ColumnData::Numeric(v) => {
                            b.push_bind(v.get(row).copied().flatten());
                        }
                        ColumnData::Text(v) => {
                            b.push_bind(v.get(row).cloned().flatten());
                        }
                        ColumnData::Temporal(v) => {
                            b.push_bind(v.get(row).copied().flatten());
                        }
                    }
                }
            });
            let done = qb
                .build()
                .execute(&mut *tx)
                .await
                .map_err(|e| normalize_error(&e, table))?;
            inserted += done.rows_affected();
            start = end;
        }
        tx.commit().await.map_err(|e| normalize_error(&e, table))?;
        Ok(inserted)
    }
}

#[async_trait]
impl DatabaseSession for MySqlSession {
    async fn fetch_table(&mut self, table: &str) -> Result<Table, StrataError> {
        let sql = format!("SELECT * FROM {}", ident::quote_ident(table)?);
        self.read(&sql, table).await
    }

    async fn query(&mut self, sql: &str) -> Result<Table, StrataError> {
        self.read(sql, "query").await
    }

    /// Create or reuse `table` per `if_exists`, then insert every row in one
    /// transaction. DDL commits implicitly in MySQL, so a failed insert leaves
    /// a created or emptied table behind.
    async fn write_table(
        &mut self,
        table: &str,
        data: &Table,
        if_exists: IfExists,
    ) -> Result<u64, StrataError> {
        if data.width() == 0 {
            return Err(StrataError::InvalidArg(format!(
                "cannot write {table}: table has no columns"
            )));
        }
        let exists = self.table_exists(table).await?;
        match (exists, if_exists) {
            (true, IfExists::Fail) => {
                return Err(StrataError::query(
                    MySqlConnector::KEY,
                    format!("table {table} already exists"),
                ));
            }
            (true, IfExists::Replace) => {
                let drop = format!("DROP TABLE {}", ident::quote_ident(table)?);
                self.execute(&drop, table).await?;
                self.execute(&ident::create_table(table, data)?, table).await?;
            }
            (true, IfExists::Append) => {}
            (false, _) => {
                self.execute(&ident::create_table(table, data)?, table).await?;
            }
        }
        let inserted = self.insert_rows(table, data).await?;
        #[cfg(feature = "tracing")]
        tracing::info!(table, rows = inserted, mode = ?if_exists, "table written");
        Ok(inserted)
    }
}
