//! Point-lookup access to persisted entities.
//!
//! The [`EntityStore`] trait is the only seam between the hydration engine
//! and whatever holds the entities. Implementations decide on connections,
//! pooling and indexing; the engine only ever asks for one `(kind, id)` at a
//! time.

use std::error::Error as StdError;

use thiserror::Error;

use crate::{Entity, EntityKind};

mod memory;

pub use memory::MemoryEntityStore;

/// Failure reported by a store while looking up a single entity.
///
/// A missing entity is not an error; stores return `Ok(None)` for that.
#[derive(Debug, Error)]
#[error("failed to look up {kind} {id}: {source}")]
pub struct LookupError {
    /// Kind that was requested.
    pub kind: EntityKind,
    /// Id that was requested.
    pub id: i64,
    /// Store-specific cause.
    #[source]
    pub source: Box<dyn StdError + Send + Sync>,
}

impl LookupError {
    /// Wrap a store-specific failure.
    pub fn new<E>(kind: EntityKind, id: i64, source: E) -> Self
    where
        E: Into<Box<dyn StdError + Send + Sync>>,
    {
        Self {
            kind,
            id,
            source: source.into(),
        }
    }
}

/// Read access to entities by `(kind, id)`.
///
/// Implementations must return an entity of the requested kind or `None`.
///
/// # Examples
///
/// ```rust
/// use osmgraph_core::{Entity, EntityKind, EntityStore, MemoryEntityStore, MetaInfo, Node, Tags};
///
/// # fn main() -> Result<(), osmgraph_core::LookupError> {
/// let node = Node {
///     id: 5,
///     meta: MetaInfo::default(),
///     tags: Tags::new(),
///     latitude: 12.5,
///     longitude: 77.5,
/// };
/// let store = MemoryEntityStore::from_entities([Entity::Node(node.clone())]);
///
/// assert_eq!(store.get(EntityKind::Node, 5)?, Some(Entity::Node(node)));
/// assert!(store.get(EntityKind::Way, 5)?.is_none());
/// # Ok(())
/// # }
/// ```
pub trait EntityStore {
    /// Fetch a single entity.
    fn get(&self, kind: EntityKind, id: i64) -> Result<Option<Entity>, LookupError>;
}

impl<S> EntityStore for &S
where
    S: EntityStore + ?Sized,
{
    fn get(&self, kind: EntityKind, id: i64) -> Result<Option<Entity>, LookupError> {
        (**self).get(kind, id)
    }
}
