use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for the strata workspace.
///
/// Covers collaborator failures (connections, queries, downloads), dataset
/// schema problems, and the merge/resample conditions of the pipeline.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StrataError {
    /// The requested capability is not configured on the importer.
    #[error("unsupported capability: {capability}")]
    Unsupported {
        /// A capability string describing what was requested (e.g. "database").
        capability: String,
    },

    /// Invalid input argument.
    #[error("invalid argument: {0}")]
    InvalidArg(String),

    /// A database or document store could not be reached or refused the credentials.
    #[error("{backend} connection failed: {msg}")]
    Connection {
        /// Backend name that failed (e.g. "mysql", "sharepoint").
        backend: String,
        /// Human-readable error message.
        msg: String,
    },

    /// A query or request failed after the connection was established.
    #[error("{backend} query failed: {msg}")]
    Query {
        /// Backend name that failed.
        backend: String,
        /// Human-readable error message.
        msg: String,
    },

    /// A table, file or folder could not be found.
    #[error("not found: {what}")]
    NotFound {
        /// Description of the missing resource, e.g. "table sales.orders".
        what: String,
    },

    /// A dataset does not have the shape the pipeline needs.
    #[error("schema error in {dataset}: {msg}")]
    Schema {
        /// Label of the offending dataset (table name or file path).
        dataset: String,
        /// What is wrong with it.
        msg: String,
    },

    /// Merge was attempted with no registered dataset.
    #[error("no dataset has been registered")]
    EmptySource,

    /// A key value could not be read as a timestamp.
    #[error("cannot parse {value:?} in column {column} (row {row}) as a timestamp")]
    TemporalParse {
        /// Column being coerced.
        column: String,
        /// Zero-based row index of the offending value.
        row: usize,
        /// The raw value as text.
        value: String,
    },

    /// A resampling frequency string could not be understood.
    #[error("invalid frequency: {0}")]
    InvalidFrequency(String),

    /// Downloaded bytes are not valid delimited text.
    #[error("cannot decode {dataset}: {msg}")]
    Decode {
        /// Label of the dataset being decoded.
        dataset: String,
        /// Decoder message.
        msg: String,
    },

    /// Unknown/opaque error.
    #[error("unknown error: {0}")]
    Other(String),
}

impl StrataError {
    /// Helper: build an `Unsupported` error for a capability string.
    pub fn unsupported(capability: impl Into<String>) -> Self {
        Self::Unsupported {
            capability: capability.into(),
        }
    }

    /// Helper: build a `Connection` error with the backend name and message.
    pub fn connection(backend: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Connection {
            backend: backend.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build a `Query` error with the backend name and message.
    pub fn query(backend: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Query {
            backend: backend.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build a `NotFound` error for a description of the missing resource.
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    /// Helper: build a `Schema` error for a dataset label.
    pub fn schema(dataset: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Schema {
            dataset: dataset.into(),
            msg: msg.into(),
        }
    }

    /// Helper: the `Schema` error raised when a required column is absent.
    pub fn missing_column(dataset: impl Into<String>, column: &str) -> Self {
        Self::schema(dataset, format!("column {column:?} not found"))
    }

    /// Helper: build a `Decode` error for a dataset label.
    pub fn decode(dataset: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Decode {
            dataset: dataset.into(),
            msg: msg.into(),
        }
    }

    /// True for failures that mean the backend itself is unusable.
    ///
    /// Bulk imports skip individual tables on other errors but stop on these.
    #[must_use]
    pub const fn is_connection(&self) -> bool {
        matches!(self, Self::Connection { .. })
    }
}
