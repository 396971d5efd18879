mod repository;
mod sqlite;

pub use repository::*;
pub use sqlite::*;

/// Table definitions, safe to run against an existing database.
pub const SCHEMA: &str = include_str!("schema.sql");
