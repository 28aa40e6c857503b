//! Configuration types shared across the importer and source adapters.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::StrataError;

/// Canonical name every dataset's join column is renamed to on registration.
pub const DEFAULT_PRIMARY_KEY: &str = "Primary";

/// MySQL port used when a configuration leaves the port at `0`.
pub const DEFAULT_MYSQL_PORT: u16 = 3306;

/// How rows inserted by resampling are filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FillPolicy {
    /// Carry the most recent prior non-null value forward.
    #[serde(rename = "ffill", alias = "pad")]
    Forward,
    /// Carry the next following non-null value backward.
    #[serde(rename = "bfill", alias = "backfill")]
    Backward,
}

impl FromStr for FillPolicy {
    type Err = StrataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ffill" | "pad" => Ok(Self::Forward),
            "bfill" | "backfill" => Ok(Self::Backward),
            other => Err(StrataError::InvalidArg(format!(
                "unknown fill policy {other:?} (expected ffill or bfill)"
            ))),
        }
    }
}

impl fmt::Display for FillPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Forward => "ffill",
            Self::Backward => "bfill",
        })
    }
}

/// Behavior when exporting into a table that already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IfExists {
    /// Insert rows into the existing table, creating it if needed.
    #[default]
    Append,
    /// Drop the existing table and recreate it.
    Replace,
    /// Refuse to write.
    Fail,
}

/// Settings of an importer pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImporterConfig {
    /// Name join columns are renamed to on registration.
    pub primary_key: String,
    /// Field delimiter of downloaded documents.
    pub delimiter: u8,
}

impl Default for ImporterConfig {
    fn default() -> Self {
        Self {
            primary_key: DEFAULT_PRIMARY_KEY.to_string(),
            delimiter: b',',
        }
    }
}

/// Connection parameters of a relational database.
///
/// The `sql_*` aliases accept configuration dictionaries written for the
/// older importer.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Login name.
    #[serde(alias = "sql_username")]
    pub username: String,
    /// Login password.
    #[serde(alias = "sql_password")]
    pub password: String,
    /// Host name or IP address.
    #[serde(alias = "sql_ip")]
    pub host: String,
    /// TCP port; `0` selects [`DEFAULT_MYSQL_PORT`].
    #[serde(alias = "sql_port", default, deserialize_with = "port_number_or_text")]
    pub port: u16,
    /// Database (schema) to read from.
    #[serde(alias = "sql_database")]
    pub database: String,
}

/// A port written as a number or as decimal text.
#[derive(Deserialize)]
#[serde(untagged)]
enum PortRepr {
    Number(u16),
    Text(String),
}

fn port_number_or_text<'de, D>(deserializer: D) -> Result<u16, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match PortRepr::deserialize(deserializer)? {
        PortRepr::Number(port) => Ok(port),
        PortRepr::Text(text) => match text.trim() {
            "" => Ok(0),
            t => t.parse().map_err(|_| {
                serde::de::Error::custom(format!("invalid port {text:?}: expected 0-65535"))
            }),
        },
    }
}

impl DatabaseConfig {
    /// Build a configuration on the default port.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        host: impl Into<String>,
        database: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            host: host.into(),
            port: 0,
            database: database.into(),
        }
    }

    /// Override the port.
    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// The port to connect to, with `0` mapped to the MySQL default.
    #[must_use]
    pub const fn effective_port(&self) -> u16 {
        if self.port == 0 {
            DEFAULT_MYSQL_PORT
        } else {
            self.port
        }
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("host", &self.host)
            .field("port", &self.effective_port())
            .field("database", &self.database)
            .finish()
    }
}

/// Credentials for a SharePoint tenant.
///
/// Tokens are requested with the resource-owner password grant, which needs an
/// application (client) id registered in the tenant.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharePointCredentials {
    /// User principal name, e.g. `analyst@contoso.com`.
    pub username: String,
    /// User password.
    pub password: String,
    /// Application (client) id.
    pub client_id: String,
    /// Tenant id or domain, e.g. `contoso.onmicrosoft.com`.
    pub tenant: String,
}

impl SharePointCredentials {
    /// Build a credential set.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        client_id: impl Into<String>,
        tenant: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            client_id: client_id.into(),
            tenant: tenant.into(),
        }
    }
}

impl fmt::Debug for SharePointCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharePointCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("client_id", &self.client_id)
            .field("tenant", &self.tenant)
            .finish()
    }
}
