//! strata-core
//!
//! Capability traits, the source registry, and the merge/resample engine
//! shared across the strata workspace.
//!
//! - `source`: the `DatabaseConnector` and `DocumentStore` capability traits
//!   and their session types.
//! - `registry`: the append-only `SourceRegistry`.
//! - `timeseries`: outer-join merging, temporal coercion and resampling.
//! - `delimited`: decoding of headerless delimited files.
//!
//! Collaborator I/O is async (`async_trait`) and expects a Tokio 1.x runtime
//! in the adapters; merging and resampling are synchronous.
#![warn(missing_docs)]

pub mod delimited;
/// The append-only registry of normalized datasets.
pub mod registry;
/// Capability traits implemented by database and document-store adapters.
pub mod source;
pub mod timeseries;

pub use delimited::decode_delimited;
pub use registry::{RegisteredSource, SourceRegistry};
pub use source::{DatabaseConnector, DatabaseSession, DocumentSession, DocumentStore};
pub use timeseries::merge::{merge_all, outer_join};
pub use timeseries::parse::{coerce_column, parse_timestamp};
pub use timeseries::resample::{MAX_GRID_POINTS, ResampleOutcome, resample, try_resample};

pub use strata_types::*;
