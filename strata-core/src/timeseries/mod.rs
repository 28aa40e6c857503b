//! Table merging and resampling.
//!
//! - `merge`: progressive full outer join of registered datasets on the key column
//! - `parse`: coercion of key values into timestamps
//! - `resample`: regular-grid resampling with optional gap filling
/// Outer joins on the shared key column.
pub mod merge;
pub mod parse;
/// Regular-grid resampling.
pub mod resample;
