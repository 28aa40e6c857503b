//! Credentials from the environment.
//!
//! Variables are read from the process environment after loading a `.env`
//! file from the working directory, if there is one.
//!
//! | variable | field |
//! |---|---|
//! | `STRATA_SQL_USERNAME` | [`DatabaseConfig::username`] |
//! | `STRATA_SQL_PASSWORD` | [`DatabaseConfig::password`] |
//! | `STRATA_SQL_HOST` | [`DatabaseConfig::host`] |
//! | `STRATA_SQL_PORT` | [`DatabaseConfig::port`] (optional) |
//! | `STRATA_SQL_DATABASE` | [`DatabaseConfig::database`] |
//! | `STRATA_SHAREPOINT_USERNAME` | [`SharePointCredentials::username`] |
//! | `STRATA_SHAREPOINT_PASSWORD` | [`SharePointCredentials::password`] |
//! | `STRATA_SHAREPOINT_CLIENT_ID` | [`SharePointCredentials::client_id`] |
//! | `STRATA_SHAREPOINT_TENANT` | [`SharePointCredentials::tenant`] |

use strata_core::{DatabaseConfig, SharePointCredentials, StrataError};

fn required(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<String, StrataError> {
    lookup(key)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| StrataError::InvalidArg(format!("missing {key} in environment (.env)")))
}

fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Database settings from `STRATA_SQL_*` variables.
///
/// # Errors
/// Returns `InvalidArg` if a required variable is missing or the port is not a number.
pub fn database_config() -> Result<DatabaseConfig, StrataError> {
    dotenvy::dotenv().ok();
    database_config_with(process_env)
}

/// Database settings read through `lookup` instead of the process environment.
///
/// # Errors
/// As [`database_config`].
pub fn database_config_with(
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<DatabaseConfig, StrataError> {
    let port = match lookup("STRATA_SQL_PORT").filter(|v| !v.is_empty()) {
        Some(raw) => raw.trim().parse::<u16>().map_err(|e| {
            StrataError::InvalidArg(format!("STRATA_SQL_PORT={raw:?} is not a port: {e}"))
        })?,
        None => 0,
    };
    Ok(DatabaseConfig::new(
        required(&lookup, "STRATA_SQL_USERNAME")?,
        required(&lookup, "STRATA_SQL_PASSWORD")?,
        required(&lookup, "STRATA_SQL_HOST")?,
        required(&lookup, "STRATA_SQL_DATABASE")?,
    )
    .with_port(port))
}

/// SharePoint credentials from `STRATA_SHAREPOINT_*` variables.
///
/// # Errors
/// Returns `InvalidArg` if a variable is missing.
pub fn sharepoint_credentials() -> Result<SharePointCredentials, StrataError> {
    dotenvy::dotenv().ok();
    sharepoint_credentials_with(process_env)
}

/// SharePoint credentials read through `lookup` instead of the process environment.
///
/// # Errors
/// As [`sharepoint_credentials`].
pub fn sharepoint_credentials_with(
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<SharePointCredentials, StrataError> {
    Ok(SharePointCredentials::new(
        required(&lookup, "STRATA_SHAREPOINT_USERNAME")?,
        required(&lookup, "STRATA_SHAREPOINT_PASSWORD")?,
        required(&lookup, "STRATA_SHAREPOINT_CLIENT_ID")?,
        required(&lookup, "STRATA_SHAREPOINT_TENANT")?,
    ))
}
