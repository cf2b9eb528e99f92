//! Consumers of the parsed event stream.

use std::{convert::Infallible, error::Error as StdError};

use osmgraph_core::{Bound, Entity, MemoryEntityStore, Node, Relation, Way};

use crate::ingest::{DocumentCounts, OsmEvent};

/// Receives parsed events in document order.
///
/// Buffering and batching are up to the implementation; the builder hands
/// over each event as soon as it is complete.
pub trait OsmSink {
    /// Failure raised by the sink itself.
    type Error: StdError + Send + Sync + 'static;

    /// Accept one event.
    ///
    /// # Errors
    ///
    /// Implementation-defined. Ingestion stops at the first error.
    fn on_event(&mut self, event: OsmEvent) -> Result<(), Self::Error>;

    /// The current document failed and no `DocumentCompleted` will follow.
    ///
    /// Sinks that stage writes per document discard them here. The default
    /// does nothing.
    ///
    /// # Errors
    ///
    /// Implementation-defined.
    fn abort(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl<S: OsmSink + ?Sized> OsmSink for &mut S {
    type Error = S::Error;

    fn on_event(&mut self, event: OsmEvent) -> Result<(), Self::Error> {
        (**self).on_event(event)
    }

    fn abort(&mut self) -> Result<(), Self::Error> {
        (**self).abort()
    }
}

/// Everything read from one document, held in memory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedDocument {
    /// The last `bounds` element seen, if any.
    pub bound: Option<Bound>,
    /// Nodes in document order.
    pub nodes: Vec<Node>,
    /// Ways in document order.
    pub ways: Vec<Way>,
    /// Relations in document order.
    pub relations: Vec<Relation>,
    /// Set once the document completed.
    pub counts: Option<DocumentCounts>,
}

impl ParsedDocument {
    /// All entities in kind order: nodes, then ways, then relations.
    pub fn entities(self) -> impl Iterator<Item = Entity> {
        self.nodes
            .into_iter()
            .map(Entity::Node)
            .chain(self.ways.into_iter().map(Entity::Way))
            .chain(self.relations.into_iter().map(Entity::Relation))
    }
}

impl From<ParsedDocument> for MemoryEntityStore {
    fn from(document: ParsedDocument) -> Self {
        document.entities().collect()
    }
}

/// Sink that keeps every event in a [`ParsedDocument`].
///
/// ```
/// use osmgraph_core::{EntityKind, EntityStore, MemoryEntityStore};
/// use osmgraph_data::{CollectingSink, ingest_reader};
///
/// let xml = r#"<osm><node id="1" lat="1" lon="2"/></osm>"#;
/// let mut sink = CollectingSink::default();
/// let counts = ingest_reader(xml.as_bytes(), &mut sink).expect("ingest");
/// assert_eq!(counts.nodes, 1);
///
/// let store = MemoryEntityStore::from(sink.into_document());
/// assert!(store.get(EntityKind::Node, 1).expect("lookup").is_some());
/// ```
#[derive(Debug, Default)]
pub struct CollectingSink {
    document: ParsedDocument,
}

impl CollectingSink {
    /// What has been collected so far.
    #[must_use]
    pub const fn document(&self) -> &ParsedDocument {
        &self.document
    }

    /// Take the collected document.
    #[must_use]
    pub fn into_document(self) -> ParsedDocument {
        self.document
    }
}

impl OsmSink for CollectingSink {
    type Error = Infallible;

    fn on_event(&mut self, event: OsmEvent) -> Result<(), Self::Error> {
        match event {
            OsmEvent::NodeParsed(node) => self.document.nodes.push(node),
            OsmEvent::WayParsed(way) => self.document.ways.push(way),
            OsmEvent::RelationParsed(relation) => self.document.relations.push(relation),
            OsmEvent::BoundParsed(bound) => self.document.bound = Some(bound),
            OsmEvent::DocumentCompleted(counts) => self.document.counts = Some(counts),
        }
        Ok(())
    }
}
