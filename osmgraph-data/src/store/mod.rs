//! SQLite persistence for parsed entities.
//!
//! The module is split into focused submodules:
//! - [`schema`] creates the per-kind tables and checks the schema version.
//! - `sqlite` writes entities as they stream in and serves point lookups.
#![forbid(unsafe_code)]

mod error;
pub mod schema;
mod sqlite;

pub use error::SqliteStoreError;
pub use sqlite::SqliteEntityStore;
