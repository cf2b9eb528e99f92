//! Test-only entity builders and instrumented `EntityStore` implementations
//! used by unit and behaviour tests.

use std::{cell::RefCell, collections::HashSet};

use crate::{
    Entity, EntityKind, EntityStore, LookupError, Member, MemberRef, MetaInfo, Node, Relation,
    Tags, Way,
};

/// Node with empty metadata and tags.
#[must_use]
pub fn node(id: i64, latitude: f64, longitude: f64) -> Node {
    Node {
        id,
        meta: MetaInfo::default(),
        tags: Tags::new(),
        latitude,
        longitude,
    }
}

/// Way with empty metadata and tags.
#[must_use]
pub fn way(id: i64, node_ids: &[i64]) -> Way {
    Way {
        id,
        meta: MetaInfo::default(),
        tags: Tags::new(),
        node_ids: node_ids.to_vec(),
    }
}

/// Relation with empty metadata and tags.
#[must_use]
pub fn relation(id: i64, members: &[(MemberRef, &str)]) -> Relation {
    Relation {
        id,
        meta: MetaInfo::default(),
        tags: Tags::new(),
        members: members
            .iter()
            .map(|(reference, role)| Member::new(*reference, *role))
            .collect(),
    }
}

/// Store wrapper that records every lookup it forwards.
#[derive(Debug, Default)]
pub struct CountingStore<S> {
    inner: S,
    lookups: RefCell<Vec<(EntityKind, i64)>>,
}

impl<S> CountingStore<S> {
    /// Wrap `inner` with an empty lookup log.
    pub const fn new(inner: S) -> Self {
        Self {
            inner,
            lookups: RefCell::new(Vec::new()),
        }
    }

    /// Every lookup in call order.
    #[must_use]
    pub fn lookups(&self) -> Vec<(EntityKind, i64)> {
        self.lookups.borrow().clone()
    }

    /// Number of lookups issued for `kind`.
    #[must_use]
    pub fn lookups_of(&self, kind: EntityKind) -> usize {
        self.lookups
            .borrow()
            .iter()
            .filter(|(looked_up, _)| *looked_up == kind)
            .count()
    }

    /// Whether any `(kind, id)` was looked up more than once.
    #[must_use]
    pub fn has_repeated_lookups(&self) -> bool {
        let lookups = self.lookups.borrow();
        let distinct: HashSet<_> = lookups.iter().collect();
        distinct.len() != lookups.len()
    }
}

impl<S: EntityStore> EntityStore for CountingStore<S> {
    fn get(&self, kind: EntityKind, id: i64) -> Result<Option<Entity>, LookupError> {
        self.lookups.borrow_mut().push((kind, id));
        self.inner.get(kind, id)
    }
}

/// Store that fails for one `(kind, id)` and delegates everything else.
#[derive(Debug)]
pub struct FailingStore<S> {
    inner: S,
    target: (EntityKind, i64),
}

impl<S> FailingStore<S> {
    /// Fail lookups of `(kind, id)`; forward the rest to `inner`.
    pub const fn new(inner: S, kind: EntityKind, id: i64) -> Self {
        Self {
            inner,
            target: (kind, id),
        }
    }
}

impl<S: EntityStore> EntityStore for FailingStore<S> {
    fn get(&self, kind: EntityKind, id: i64) -> Result<Option<Entity>, LookupError> {
        if (kind, id) == self.target {
            return Err(LookupError::new(kind, id, "simulated store outage"));
        }
        self.inner.get(kind, id)
    }
}

/// Store that answers every lookup with a node, whatever kind was asked.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConfusedStore;

impl EntityStore for ConfusedStore {
    fn get(&self, _kind: EntityKind, id: i64) -> Result<Option<Entity>, LookupError> {
        Ok(Some(Entity::Node(node(id, 0.0, 0.0))))
    }
}
