pub mod database;
pub mod documents;
