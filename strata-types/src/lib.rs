//! Strata data transfer objects: tables, errors, frequencies and source configuration.
#![warn(missing_docs)]

mod config;
mod error;
mod frequency;
mod location;
mod reports;
mod table;

pub use config::{
    DEFAULT_MYSQL_PORT, DEFAULT_PRIMARY_KEY, DatabaseConfig, FillPolicy, IfExists, ImporterConfig,
    SharePointCredentials,
};
pub use error::StrataError;
pub use frequency::{Frequency, FrequencyUnit};
pub use location::DocumentLocation;
pub use reports::ProduceReport;
pub use table::{Cell, Column, ColumnData, ColumnKind, Table};
pub use url::Url;
