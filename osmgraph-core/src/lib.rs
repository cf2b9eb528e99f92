//! Core model for OpenStreetMap entities and their hydration.
//!
//! Parsed entities refer to each other by id: a way lists node ids and a
//! relation lists typed member references. [`Hydrator`] follows those
//! references through an [`EntityStore`] and yields self-contained bean
//! trees, absorbing dangling references and cyclic relation graphs.
//!
//! Nothing here performs I/O. Parsing and persistent stores live in
//! `osmgraph-data`.

pub mod bean;
pub mod bound;
pub mod entity;
pub mod hydrate;
pub mod store;
pub mod tags;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use bean::{Bean, MemberBean, MemberTarget, NodeBean, RelationBean, WayBean};
pub use bound::{Bound, BoundError};
pub use entity::{
    Entity, EntityKind, Member, MemberRef, MetaInfo, Node, Relation, Tags, UnknownKindError, Way,
};
pub use hydrate::{HydrateError, Hydrator};
pub use store::{EntityStore, LookupError, MemoryEntityStore};
