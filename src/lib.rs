//! Facade crate for the osmgraph OSM entity graph toolkit.
//!
//! This crate re-exports the entity model and the hydration engine, and the
//! OSM XML ingestion pipeline with its SQLite store behind the
//! `store-sqlite` feature.
//!
//! ```
//! use osmgraph::{EntityKind, Hydrator, MemoryEntityStore};
//!
//! let store = MemoryEntityStore::default();
//! let bean = Hydrator::new(&store).hydrate(EntityKind::Relation, 1).expect("lookup");
//! assert!(bean.is_none());
//! ```

#![forbid(unsafe_code)]

pub use osmgraph_core::{
    Bean, Bound, BoundError, Entity, EntityKind, EntityStore, HydrateError, Hydrator, LookupError,
    Member, MemberBean, MemberRef, MemberTarget, MemoryEntityStore, MetaInfo, Node, NodeBean,
    Relation, RelationBean, Tags, UnknownKindError, Way, WayBean, tags,
};

#[cfg(feature = "store-sqlite")]
pub use osmgraph_data::{
    CollectingSink, DocumentCounts, IngestError, OsmEvent, OsmReadError, OsmSink, ParsedDocument,
    SqliteEntityStore, SqliteStoreError, ingest_osm_xml, ingest_reader,
};
