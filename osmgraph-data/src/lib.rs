//! Ingestion and persistence for OSM entity graphs.
//!
//! Responsibilities:
//! - Parse OSM XML into typed events and deliver them to an [`OsmSink`].
//! - Persist entities in SQLite and serve them back through
//!   [`osmgraph_core::EntityStore`].
//!
//! Boundaries:
//! - Hydration and the entity model live in `osmgraph-core`.
//! - Parsing is single-threaded and synchronous; one reader drives one
//!   builder.

use std::{error::Error as StdError, io::BufReader};

use camino::{Utf8Path, Utf8PathBuf};
use log::{info, warn};
use thiserror::Error;

mod fs;
pub mod ingest;
mod sink;
pub mod store;

pub use fs::is_regular_file;
pub use ingest::{DocumentCounts, OsmEvent, OsmReadError};
pub use sink::{CollectingSink, OsmSink, ParsedDocument};
pub use store::{SqliteEntityStore, SqliteStoreError};

/// Errors returned by [`ingest_osm_xml`] and [`ingest_reader`].
#[derive(Debug, Error)]
pub enum IngestError {
    /// The source file could not be opened.
    #[error("failed to open OSM XML file at {path}")]
    Open {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The document is malformed.
    #[error("failed to read OSM XML")]
    Read(#[from] OsmReadError),
    /// The sink rejected an event.
    #[error("sink failed to accept a parsed event")]
    Sink(#[source] Box<dyn StdError + Send + Sync>),
}

/// Stream an OSM XML file into `sink`.
///
/// # Errors
///
/// See [`IngestError`]. On failure the sink is told through
/// [`OsmSink::abort`]; events it already accepted are not redelivered.
///
/// # Examples
/// ```no_run
/// use camino::Utf8Path;
/// use osmgraph_data::{CollectingSink, ingest_osm_xml};
///
/// # fn main() -> Result<(), osmgraph_data::IngestError> {
/// let mut sink = CollectingSink::default();
/// let counts = ingest_osm_xml(Utf8Path::new("berlin.osm"), &mut sink)?;
/// println!("Read {} ways", counts.ways);
/// # Ok(())
/// # }
/// ```
pub fn ingest_osm_xml<S: OsmSink>(
    path: &Utf8Path,
    sink: &mut S,
) -> Result<DocumentCounts, IngestError> {
    let file = fs::open_file(path).map_err(|source| IngestError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Ingesting OSM XML from {path}");
    ingest_reader(BufReader::new(file), sink)
}

/// Stream an OSM XML document from any buffered reader into `sink`.
///
/// # Errors
///
/// [`IngestError::Read`] for malformed input and [`IngestError::Sink`] when
/// the sink fails. Either way [`OsmSink::abort`] is called before returning.
pub fn ingest_reader<R, S>(reader: R, sink: &mut S) -> Result<DocumentCounts, IngestError>
where
    R: std::io::BufRead,
    S: OsmSink,
{
    let completed = deliver(reader, sink).inspect_err(|_| {
        if let Err(err) = sink.abort() {
            warn!("Sink failed to discard the aborted document: {err}");
        }
    })?;
    info!(
        "Ingested {} nodes, {} ways and {} relations",
        completed.nodes, completed.ways, completed.relations
    );
    Ok(completed)
}

fn deliver<R, S>(reader: R, sink: &mut S) -> Result<DocumentCounts, IngestError>
where
    R: std::io::BufRead,
    S: OsmSink,
{
    let mut completed = DocumentCounts::default();
    for event in ingest::OsmXmlEvents::from_reader(reader) {
        let event = event?;
        if let OsmEvent::DocumentCompleted(counts) = &event {
            completed = *counts;
        }
        sink.on_event(event)
            .map_err(|err| IngestError::Sink(Box::new(err)))?;
    }
    Ok(completed)
}
