//! Error types emitted by the osmgraph CLI.

use std::sync::Arc;

use camino::Utf8PathBuf;
use osmgraph_core::{EntityKind, HydrateError};
use osmgraph_data::{IngestError, SqliteStoreError};
use thiserror::Error;

/// Errors emitted by the osmgraph CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Flag name without the leading dashes.
        field: &'static str,
        /// Environment variable that can supply the value.
        env: &'static str,
    },
    /// A referenced input path does not exist on disk.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        /// Flag naming the input.
        field: &'static str,
        /// Path that was checked.
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        /// Flag naming the input.
        field: &'static str,
        /// Path that was checked.
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        /// Flag naming the input.
        field: &'static str,
        /// Path that was checked.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Opening the entity database failed.
    #[error("failed to open entity database at {path:?}: {source}")]
    OpenStore {
        /// Database path.
        path: Utf8PathBuf,
        /// Store failure.
        #[source]
        source: SqliteStoreError,
    },
    /// Reading the extract or writing its entities failed.
    #[error("failed to ingest {path:?}: {source}")]
    Ingest {
        /// Extract path.
        path: Utf8PathBuf,
        /// Ingestion failure.
        #[source]
        source: IngestError,
    },
    /// A lookup failed while resolving references.
    #[error(transparent)]
    Hydrate(#[from] HydrateError),
    /// The requested root entity is not stored.
    #[error("{kind} {id} is not stored in the database")]
    NotFound {
        /// Requested kind.
        kind: EntityKind,
        /// Requested id.
        id: i64,
    },
    /// The hydrated tree nests more relations than can be printed.
    #[error("{kind} {id} nests {depth} relations; at most {limit} can be printed")]
    TooDeep {
        /// Root kind.
        kind: EntityKind,
        /// Root id.
        id: i64,
        /// Relation levels in the tree.
        depth: usize,
        /// Printable limit.
        limit: usize,
    },
    /// Serialising the hydrated tree failed.
    #[error("failed to serialise hydrated entity: {0}")]
    SerialiseBean(#[source] serde_json::Error),
    /// Writing the hydrated tree failed.
    #[error("failed to write hydrated entity: {0}")]
    WriteOutput(#[source] std::io::Error),
}
