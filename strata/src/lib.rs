//! Strata imports tables from a database and a document library, merges them
//! on a shared key and resamples the result onto a regular time grid.
//!
//! Overview
//! - Each imported table names its join column, which is renamed to a common
//!   primary key (`"Primary"` by default) on registration.
//! - [`Importer::produce`] outer-joins every dataset in registration order,
//!   renames the key to the caller's canonical name and resamples on it.
//! - Collaborators plug in through the `strata_core` capability traits:
//!   `strata-sql` for MySQL, `strata-sharepoint` for SharePoint, `strata-mock`
//!   for tests.
//!
//! Key behaviors
//! - Database imports skip tables that are missing or lack their join column;
//!   each skip is logged and kept in [`Importer::warnings`]. A lost connection
//!   aborts the import.
//! - The document-store session is opened on the first folder or file import
//!   and reused afterwards.
//! - Folder imports are all-or-nothing.
//! - Resampling never fails `produce`: an unusable key or frequency returns
//!   the merged table and a warning instead.
//!
//! Example
//! ```rust,ignore
//! use std::sync::Arc;
//! use strata::{FillPolicy, Importer, env};
//!
//! let mut importer = Importer::builder()
//!     .with_database(Arc::new(strata_sql::MySqlConnector::new()))
//!     .with_document_store(Arc::new(strata_sharepoint::SharePointStore::new()))
//!     .build()?;
//!
//! importer
//!     .register_from_database(&env::database_config()?, &["line1"], &["Timestamp"])
//!     .await?;
//! importer
//!     .register_from_folder(
//!         &env::sharepoint_credentials()?,
//!         "Telemetry",
//!         "https://contoso.sharepoint.com/sites/Telemetry/Shared%20Documents/Sensors",
//!         "0",
//!     )
//!     .await?;
//!
//! let table = importer.produce("1min", "DateTime", Some(FillPolicy::Forward))?;
//! ```
#![warn(missing_docs)]

mod core;
pub mod env;
mod export;
mod import;

pub use crate::core::{Importer, ImporterBuilder};
pub use export::export_table;

pub use strata_core::{
    Cell, Column, ColumnData, ColumnKind, DatabaseConfig, DatabaseConnector, DatabaseSession,
    DocumentLocation, DocumentSession, DocumentStore, FillPolicy, Frequency, FrequencyUnit,
    IfExists, ImporterConfig, ProduceReport, SharePointCredentials, SourceRegistry, StrataError,
    Table,
};
