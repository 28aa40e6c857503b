//! `Importer` operations, grouped by source.
mod database;
mod documents;
mod produce;
