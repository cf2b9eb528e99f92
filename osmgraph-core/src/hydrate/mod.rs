//! Hydration of id-referenced entities into nested bean trees.
//!
//! Responsibilities:
//! - Follow way node references and relation member references through an
//!   [`EntityStore`], producing self-contained beans.
//! - Absorb dangling references as [`MemberTarget::Missing`] / `None` slots.
//! - Terminate on cyclic relation graphs by substituting
//!   [`MemberTarget::Cycle`] for members already open on the current path.
//!
//! Invariants:
//! - Child order mirrors the source entity exactly; nothing is sorted or
//!   deduplicated.
//! - Each distinct `(kind, id)` is fetched from the store at most once per
//!   call. No state survives between calls.
//! - Relation nesting is walked with an explicit stack, so deeply nested
//!   inputs do not grow the call stack.

use std::collections::HashMap;

use log::{debug, warn};
use thiserror::Error;

use crate::{
    Bean, Entity, EntityKind, EntityStore, LookupError, Member, MemberBean, MemberRef,
    MemberTarget, MetaInfo, Node, NodeBean, Relation, RelationBean, Tags, Way, WayBean,
};

mod path;

pub use path::OpenPath;

/// Errors returned by [`Hydrator`].
///
/// Dangling references and cycles are not errors; they become placeholder
/// slots in the produced tree.
#[derive(Debug, Error)]
pub enum HydrateError {
    /// The store failed while fetching an entity.
    #[error(transparent)]
    Lookup(#[from] LookupError),
    /// The store answered a lookup with an entity of another kind.
    #[error("store returned a {found} for {requested} {id}")]
    KindMismatch {
        /// Kind the engine asked for.
        requested: EntityKind,
        /// Kind the store returned.
        found: EntityKind,
        /// Requested id.
        id: i64,
    },
}

/// Resolves entities into beans through an [`EntityStore`].
///
/// The hydrator holds no mutable state, so independent calls may run
/// concurrently when the store allows it.
///
/// # Examples
///
/// ```
/// use osmgraph_core::{
///     Entity, Hydrator, Member, MemberRef, MemberTarget, MemoryEntityStore, MetaInfo, Relation,
///     Tags,
/// };
///
/// # fn main() -> Result<(), osmgraph_core::HydrateError> {
/// let relation = Relation {
///     id: 1,
///     meta: MetaInfo::default(),
///     tags: Tags::new(),
///     members: vec![Member::new(MemberRef::Relation(1), "")],
/// };
/// let store = MemoryEntityStore::from_entities([Entity::Relation(relation)]);
/// let bean = Hydrator::new(&store).relation(1)?.expect("relation 1 exists");
///
/// assert_eq!(bean.members[0].target, MemberTarget::Cycle);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Hydrator<S> {
    store: S,
}

impl<S: EntityStore> Hydrator<S> {
    /// Wrap a store. Pass a reference to keep ownership elsewhere.
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Resolve a node. One lookup.
    pub fn node(&self, id: i64) -> Result<Option<NodeBean>, HydrateError> {
        Resolution::new(&self.store).node(id)
    }

    /// Resolve a way and its node references.
    pub fn way(&self, id: i64) -> Result<Option<WayBean>, HydrateError> {
        Resolution::new(&self.store).way(id)
    }

    /// Resolve a relation and, transitively, all of its members.
    pub fn relation(&self, id: i64) -> Result<Option<RelationBean>, HydrateError> {
        Resolution::new(&self.store).relation(id)
    }

    /// Resolve an entity of any kind.
    pub fn hydrate(&self, kind: EntityKind, id: i64) -> Result<Option<Bean>, HydrateError> {
        let bean = match kind {
            EntityKind::Node => self.node(id)?.map(Bean::Node),
            EntityKind::Way => self.way(id)?.map(Bean::Way),
            EntityKind::Relation => self.relation(id)?.map(Bean::Relation),
        };
        Ok(bean)
    }

    /// The wrapped store.
    pub const fn store(&self) -> &S {
        &self.store
    }
}

/// State scoped to a single hydration call.
struct Resolution<'s, S: ?Sized> {
    store: &'s S,
    fetched: HashMap<(EntityKind, i64), Option<Entity>>,
    missing: usize,
    cycles: usize,
}

/// Where a finished relation bean goes once its frame closes.
struct ParentSlot {
    reference: MemberRef,
    role: String,
}

/// A relation whose members are being resolved.
struct Frame {
    id: i64,
    meta: MetaInfo,
    tags: Tags,
    pending: std::vec::IntoIter<Member>,
    resolved: Vec<MemberBean>,
    slot: Option<ParentSlot>,
}

impl Frame {
    fn open(relation: Relation, slot: Option<ParentSlot>) -> Self {
        let resolved = Vec::with_capacity(relation.members.len());
        Self {
            id: relation.id,
            meta: relation.meta,
            tags: relation.tags,
            pending: relation.members.into_iter(),
            resolved,
            slot,
        }
    }

    fn close(self) -> (Option<ParentSlot>, RelationBean) {
        let bean = RelationBean {
            id: self.id,
            meta: self.meta,
            tags: self.tags,
            members: self.resolved,
        };
        (self.slot, bean)
    }
}

enum Step {
    Resolved(MemberTarget),
    Descend(Relation),
}

impl<'s, S> Resolution<'s, S>
where
    S: EntityStore + ?Sized,
{
    fn new(store: &'s S) -> Self {
        Self {
            store,
            fetched: HashMap::new(),
            missing: 0,
            cycles: 0,
        }
    }

    fn fetch(&mut self, kind: EntityKind, id: i64) -> Result<Option<Entity>, HydrateError> {
        if let Some(cached) = self.fetched.get(&(kind, id)) {
            return Ok(cached.clone());
        }
        debug!("Looking up {kind} {id}");
        let entity = self.store.get(kind, id)?;
        if let Some(found) = &entity
            && found.kind() != kind
        {
            return Err(HydrateError::KindMismatch {
                requested: kind,
                found: found.kind(),
                id,
            });
        }
        if entity.is_none() {
            self.missing += 1;
            warn!("Dangling reference to {kind} {id}");
        }
        self.fetched.insert((kind, id), entity.clone());
        Ok(entity)
    }

    fn fetch_node(&mut self, id: i64) -> Result<Option<Node>, HydrateError> {
        match self.fetch(EntityKind::Node, id)? {
            Some(Entity::Node(node)) => Ok(Some(node)),
            _ => Ok(None),
        }
    }

    fn fetch_way(&mut self, id: i64) -> Result<Option<Way>, HydrateError> {
        match self.fetch(EntityKind::Way, id)? {
            Some(Entity::Way(way)) => Ok(Some(way)),
            _ => Ok(None),
        }
    }

    fn fetch_relation(&mut self, id: i64) -> Result<Option<Relation>, HydrateError> {
        match self.fetch(EntityKind::Relation, id)? {
            Some(Entity::Relation(relation)) => Ok(Some(relation)),
            _ => Ok(None),
        }
    }

    fn node(&mut self, id: i64) -> Result<Option<NodeBean>, HydrateError> {
        Ok(self.fetch_node(id)?.map(NodeBean::from))
    }

    fn way(&mut self, id: i64) -> Result<Option<WayBean>, HydrateError> {
        let Some(way) = self.fetch_way(id)? else {
            return Ok(None);
        };
        let nodes = way
            .node_ids
            .iter()
            .map(|node_id| self.node(*node_id))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Some(WayBean {
            id: way.id,
            meta: way.meta,
            tags: way.tags,
            nodes,
        }))
    }

    fn relation(&mut self, id: i64) -> Result<Option<RelationBean>, HydrateError> {
        let Some(root) = self.fetch_relation(id)? else {
            return Ok(None);
        };
        let mut path = OpenPath::default();
        path.enter(root.id);
        let mut stack = vec![Frame::open(root, None)];

        while let Some(frame) = stack.last_mut() {
            if let Some(Member { reference, role }) = frame.pending.next() {
                match self.step(reference, &path)? {
                    Step::Resolved(target) => frame.resolved.push(MemberBean {
                        reference,
                        role,
                        target,
                    }),
                    Step::Descend(child) => {
                        path.enter(child.id);
                        stack.push(Frame::open(child, Some(ParentSlot { reference, role })));
                    }
                }
                continue;
            }

            let Some(done) = stack.pop() else { break };
            path.leave(done.id);
            let (slot, bean) = done.close();
            match (slot, stack.last_mut()) {
                (Some(ParentSlot { reference, role }), Some(parent)) => {
                    parent.resolved.push(MemberBean {
                        reference,
                        role,
                        target: MemberTarget::Relation(Box::new(bean)),
                    });
                }
                _ => {
                    debug!(
                        "Hydrated relation {id}: {} entities fetched, {} missing, {} cycles",
                        self.fetched.len(),
                        self.missing,
                        self.cycles
                    );
                    return Ok(Some(bean));
                }
            }
        }
        Ok(None)
    }

    fn step(&mut self, reference: MemberRef, path: &OpenPath) -> Result<Step, HydrateError> {
        let target = match reference {
            MemberRef::Node(id) => self
                .node(id)?
                .map_or(MemberTarget::Missing, MemberTarget::Node),
            MemberRef::Way(id) => self
                .way(id)?
                .map_or(MemberTarget::Missing, MemberTarget::Way),
            MemberRef::Relation(id) if path.contains(id) => {
                self.cycles += 1;
                debug!("Relation {id} is already open on this path; marking cycle");
                MemberTarget::Cycle
            }
            MemberRef::Relation(id) => match self.fetch_relation(id)? {
                Some(child) => return Ok(Step::Descend(child)),
                None => MemberTarget::Missing,
            },
        };
        Ok(Step::Resolved(target))
    }
}
