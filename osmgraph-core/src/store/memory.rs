//! In-memory `EntityStore` backed by per-kind hash maps.

use std::collections::HashMap;

use crate::{Entity, EntityKind, Node, Relation, Way};

use super::{EntityStore, LookupError};

/// Entity store holding everything in memory.
///
/// Suited to small extracts and tests. Inserting an entity whose `(kind, id)`
/// is already present replaces the previous value.
#[derive(Debug, Clone, Default)]
pub struct MemoryEntityStore {
    nodes: HashMap<i64, Node>,
    ways: HashMap<i64, Way>,
    relations: HashMap<i64, Relation>,
}

impl MemoryEntityStore {
    /// Build a store from any collection of entities.
    pub fn from_entities<I>(entities: I) -> Self
    where
        I: IntoIterator<Item = Entity>,
    {
        let mut store = Self::default();
        store.extend(entities);
        store
    }

    /// Add or replace an entity.
    pub fn insert(&mut self, entity: Entity) {
        match entity {
            Entity::Node(node) => {
                self.nodes.insert(node.id, node);
            }
            Entity::Way(way) => {
                self.ways.insert(way.id, way);
            }
            Entity::Relation(relation) => {
                self.relations.insert(relation.id, relation);
            }
        }
    }

    /// Number of stored entities of `kind`.
    #[must_use]
    pub fn count(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Node => self.nodes.len(),
            EntityKind::Way => self.ways.len(),
            EntityKind::Relation => self.relations.len(),
        }
    }

    /// Whether no entity of any kind is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.ways.is_empty() && self.relations.is_empty()
    }
}

impl Extend<Entity> for MemoryEntityStore {
    fn extend<T: IntoIterator<Item = Entity>>(&mut self, iter: T) {
        for entity in iter {
            self.insert(entity);
        }
    }
}

impl FromIterator<Entity> for MemoryEntityStore {
    fn from_iter<T: IntoIterator<Item = Entity>>(iter: T) -> Self {
        Self::from_entities(iter)
    }
}

impl EntityStore for MemoryEntityStore {
    fn get(&self, kind: EntityKind, id: i64) -> Result<Option<Entity>, LookupError> {
        let entity = match kind {
            EntityKind::Node => self.nodes.get(&id).cloned().map(Entity::Node),
            EntityKind::Way => self.ways.get(&id).cloned().map(Entity::Way),
            EntityKind::Relation => self.relations.get(&id).cloned().map(Entity::Relation),
        };
        Ok(entity)
    }
}
