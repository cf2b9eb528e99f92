use camino::Utf8PathBuf;
use osmgraph_core::EntityKind;
use rusqlite::Error as SqliteError;
use thiserror::Error;

/// Errors raised by [`SqliteEntityStore`](super::SqliteEntityStore).
#[derive(Debug, Error)]
pub enum SqliteStoreError {
    /// Failed to create the parent directory for the database file.
    #[error("failed to create parent directory for {path}")]
    CreateDirectory {
        /// Database path whose parent could not be created.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Opening the SQLite database failed.
    #[error("failed to open SQLite database at {path}")]
    Open {
        /// Database path.
        path: Utf8PathBuf,
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// A schema step failed.
    #[error("failed to execute schema step '{step}'")]
    CreateSchema {
        /// Name of the failing step.
        step: &'static str,
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// The database was written by an incompatible schema.
    #[error("expected entity schema version {expected} but found {found}")]
    VersionMismatch {
        /// Version this build understands.
        expected: i64,
        /// Version recorded in the database.
        found: i64,
    },
    /// Writing an entity row failed.
    #[error("failed to persist {kind} {id}")]
    Persist {
        /// Kind of the entity being written.
        kind: EntityKind,
        /// Id of the entity being written.
        id: i64,
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// Encoding an entity column as JSON failed.
    #[error("failed to serialise {kind} {id}")]
    Serialize {
        /// Kind of the entity being written.
        kind: EntityKind,
        /// Id of the entity being written.
        id: i64,
        /// Source error produced by `serde_json`.
        #[source]
        source: serde_json::Error,
    },
    /// A stored JSON column could not be decoded.
    #[error("failed to decode stored {kind} {id}")]
    Decode {
        /// Kind of the stored entity.
        kind: EntityKind,
        /// Id of the stored entity.
        id: i64,
        /// Source error produced by `serde_json`.
        #[source]
        source: serde_json::Error,
    },
    /// Beginning or committing a batch failed.
    #[error("failed to {operation}")]
    Transaction {
        /// The transaction step that failed.
        operation: &'static str,
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// A read or maintenance query failed.
    #[error("failed to {operation}")]
    Query {
        /// What the query was doing.
        operation: &'static str,
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
}
