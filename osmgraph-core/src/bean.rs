//! Hydrated, self-contained entity trees.
//!
//! Beans are built per hydration call and own every resolved child. Slots
//! for references that could not be followed are kept in place so positions
//! always line up with the source entity.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{EntityKind, MemberRef, MetaInfo, Node, Tags};

/// A hydrated node.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NodeBean {
    /// Node id.
    pub id: i64,
    /// Edit metadata.
    pub meta: MetaInfo,
    /// Key/value annotations.
    pub tags: Tags,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

impl From<Node> for NodeBean {
    fn from(node: Node) -> Self {
        Self {
            id: node.id,
            meta: node.meta,
            tags: node.tags,
            latitude: node.latitude,
            longitude: node.longitude,
        }
    }
}

/// A hydrated way.
///
/// `nodes` mirrors the way's `node_ids` one-to-one; `None` marks a node that
/// was not present in the store.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WayBean {
    /// Way id.
    pub id: i64,
    /// Edit metadata.
    pub meta: MetaInfo,
    /// Key/value annotations.
    pub tags: Tags,
    /// One slot per declared node reference.
    pub nodes: Vec<Option<NodeBean>>,
}

impl WayBean {
    /// Ids of the declared node references that could not be resolved.
    pub fn missing_node_ids<'a>(&'a self, node_ids: &'a [i64]) -> impl Iterator<Item = i64> + 'a {
        node_ids
            .iter()
            .zip(&self.nodes)
            .filter(|(_, slot)| slot.is_none())
            .map(|(id, _)| *id)
    }
}

/// A hydrated relation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RelationBean {
    /// Relation id.
    pub id: i64,
    /// Edit metadata.
    pub meta: MetaInfo,
    /// Key/value annotations.
    pub tags: Tags,
    /// One entry per declared member, in order.
    pub members: Vec<MemberBean>,
}

impl RelationBean {
    /// Number of relation levels in this tree, counting `self` as one.
    ///
    /// ```
    /// use osmgraph_core::{MemberBean, MemberRef, MemberTarget, MetaInfo, RelationBean, Tags};
    ///
    /// let leaf = RelationBean { id: 2, meta: MetaInfo::default(), tags: Tags::new(), members: vec![] };
    /// let root = RelationBean {
    ///     id: 1,
    ///     meta: MetaInfo::default(),
    ///     tags: Tags::new(),
    ///     members: vec![MemberBean {
    ///         reference: MemberRef::Relation(2),
    ///         role: String::new(),
    ///         target: MemberTarget::Relation(Box::new(leaf)),
    ///     }],
    /// };
    /// assert_eq!(root.depth(), 2);
    /// ```
    #[must_use]
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut pending = vec![(self, 1)];
        while let Some((bean, level)) = pending.pop() {
            deepest = deepest.max(level);
            pending.extend(bean.child_relations().map(|child| (child, level + 1)));
        }
        deepest
    }

    fn child_relations(&self) -> impl Iterator<Item = &Self> {
        self.members.iter().filter_map(|member| match &member.target {
            MemberTarget::Relation(child) => Some(child.as_ref()),
            _ => None,
        })
    }
}

/// Nested relations are detached onto a heap stack and freed one level at a
/// time, so dropping a deep chain does not recurse.
impl Drop for RelationBean {
    fn drop(&mut self) {
        let mut pending = detach_relations(&mut self.members);
        while let Some(mut child) = pending.pop() {
            pending.extend(detach_relations(&mut child.members));
        }
    }
}

fn detach_relations(members: &mut Vec<MemberBean>) -> Vec<Box<RelationBean>> {
    members
        .drain(..)
        .filter_map(|member| match member.target {
            MemberTarget::Relation(child) => Some(child),
            _ => None,
        })
        .collect()
}

/// A relation member with its target resolved in place.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MemberBean {
    /// The declared reference, kept even when the target is absent.
    pub reference: MemberRef,
    /// Role label, possibly empty.
    pub role: String,
    /// What the reference resolved to.
    pub target: MemberTarget,
}

impl MemberBean {
    /// Kind named by the member reference.
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        self.reference.kind()
    }
}

/// Outcome of resolving a single member reference.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(tag = "status", content = "bean", rename_all = "lowercase")
)]
pub enum MemberTarget {
    /// A resolved node.
    Node(NodeBean),
    /// A resolved way.
    Way(WayBean),
    /// A resolved relation with its own members hydrated.
    Relation(Box<RelationBean>),
    /// The referenced entity does not exist in the store.
    Missing,
    /// The referenced relation is already open on the current resolution
    /// path; following it would not terminate.
    Cycle,
}

impl MemberTarget {
    /// Whether the slot holds a resolved bean.
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        matches!(self, Self::Node(_) | Self::Way(_) | Self::Relation(_))
    }
}

/// Root of a hydrated tree of any kind.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(tag = "kind", rename_all = "lowercase")
)]
pub enum Bean {
    /// A hydrated node.
    Node(NodeBean),
    /// A hydrated way.
    Way(WayBean),
    /// A hydrated relation.
    Relation(RelationBean),
}

impl Bean {
    /// Kind of the root entity.
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        match self {
            Self::Node(_) => EntityKind::Node,
            Self::Way(_) => EntityKind::Way,
            Self::Relation(_) => EntityKind::Relation,
        }
    }

    /// Id of the root entity.
    #[must_use]
    pub const fn id(&self) -> i64 {
        match self {
            Self::Node(bean) => bean.id,
            Self::Way(bean) => bean.id,
            Self::Relation(bean) => bean.id,
        }
    }
}

#[cfg(all(test, feature = "serde"))]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn bare_node(id: i64) -> NodeBean {
        NodeBean {
            id,
            meta: MetaInfo::default(),
            tags: Tags::new(),
            latitude: 1.5,
            longitude: -0.25,
        }
    }

    #[rstest]
    fn placeholder_slots_serialise_as_status_only() {
        let relation = RelationBean {
            id: 9,
            meta: MetaInfo::default(),
            tags: Tags::new(),
            members: vec![
                MemberBean {
                    reference: MemberRef::Way(4),
                    role: "outer".to_owned(),
                    target: MemberTarget::Missing,
                },
                MemberBean {
                    reference: MemberRef::Relation(9),
                    role: String::new(),
                    target: MemberTarget::Cycle,
                },
            ],
        };
        let value = serde_json::to_value(Bean::Relation(relation)).expect("serialise");

        assert_eq!(value["kind"], "relation");
        assert_eq!(value["members"][0]["target"], json!({ "status": "missing" }));
        assert_eq!(value["members"][0]["reference"], json!({ "way": 4 }));
        assert_eq!(value["members"][1]["target"], json!({ "status": "cycle" }));
    }

    #[rstest]
    fn resolved_slots_carry_the_bean() {
        let target = MemberTarget::Node(bare_node(3));
        let value = serde_json::to_value(&target).expect("serialise");
        assert_eq!(value["status"], "node");
        assert_eq!(value["bean"]["id"], 3);

        let back: MemberTarget = serde_json::from_value(value).expect("deserialise");
        assert_eq!(back, target);
    }

    #[rstest]
    fn missing_way_nodes_serialise_as_null() {
        let way = WayBean {
            id: 1,
            meta: MetaInfo::default(),
            tags: Tags::new(),
            nodes: vec![Some(bare_node(1)), None],
        };
        let value = serde_json::to_value(&way).expect("serialise");
        assert!(value["nodes"][1].is_null());
        assert_eq!(way.missing_node_ids(&[1, 2]).collect::<Vec<_>>(), vec![2]);
    }
}
