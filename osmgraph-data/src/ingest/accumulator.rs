//! Scratch state for the top-level element currently being parsed.
//!
//! Exactly one element is open at a time. Children append to the scratch
//! buffers, and closing the element freezes everything into an [`Entity`]
//! and leaves the accumulator empty for the next one.

use std::mem;

use osmgraph_core::{Entity, EntityKind, Member, MetaInfo, Node, Relation, Tags, Way, tags};

#[derive(Debug, Clone, Copy, PartialEq)]
struct OpenElement {
    kind: EntityKind,
    id: i64,
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Default)]
pub(super) struct ElementAccumulator {
    open: Option<OpenElement>,
    meta: MetaInfo,
    tags: Tags,
    node_ids: Vec<i64>,
    members: Vec<Member>,
}

impl ElementAccumulator {
    /// Start a way or relation, discarding any leftover scratch state.
    pub(super) fn begin(&mut self, kind: EntityKind, id: i64, meta: MetaInfo) {
        self.begin_at(kind, id, meta, (0.0, 0.0));
    }

    pub(super) fn begin_node(&mut self, id: i64, meta: MetaInfo, latitude: f64, longitude: f64) {
        self.begin_at(EntityKind::Node, id, meta, (latitude, longitude));
    }

    fn begin_at(
        &mut self,
        kind: EntityKind,
        id: i64,
        meta: MetaInfo,
        (latitude, longitude): (f64, f64),
    ) {
        self.reset();
        self.open = Some(OpenElement {
            kind,
            id,
            latitude,
            longitude,
        });
        self.meta = meta;
    }

    /// Kind and id of the open element.
    pub(super) fn open(&self) -> Option<(EntityKind, i64)> {
        self.open.map(|element| (element.kind, element.id))
    }

    pub(super) fn open_kind(&self) -> Option<EntityKind> {
        self.open.map(|element| element.kind)
    }

    /// Record a tag. Returns `false` when the key is dropped.
    pub(super) fn push_tag(&mut self, key: String, value: String) -> bool {
        if tags::is_created_by(&key) {
            return false;
        }
        self.tags.insert(key, value);
        true
    }

    pub(super) fn push_node_ref(&mut self, id: i64) {
        self.node_ids.push(id);
    }

    pub(super) fn push_member(&mut self, member: Member) {
        self.members.push(member);
    }

    /// Freeze the open element and reset the scratch state.
    pub(super) fn take(&mut self) -> Option<Entity> {
        let element = self.open.take()?;
        let meta = mem::take(&mut self.meta);
        let tags = mem::take(&mut self.tags);
        let entity = match element.kind {
            EntityKind::Node => Entity::Node(Node {
                id: element.id,
                meta,
                tags,
                latitude: element.latitude,
                longitude: element.longitude,
            }),
            EntityKind::Way => Entity::Way(Way {
                id: element.id,
                meta,
                tags,
                node_ids: mem::take(&mut self.node_ids),
            }),
            EntityKind::Relation => Entity::Relation(Relation {
                id: element.id,
                meta,
                tags,
                members: mem::take(&mut self.members),
            }),
        };
        self.reset();
        Some(entity)
    }

    pub(super) fn reset(&mut self) {
        self.open = None;
        self.meta = MetaInfo::default();
        self.tags.clear();
        self.node_ids.clear();
        self.members.clear();
    }
}
