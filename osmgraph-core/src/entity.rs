//! Immutable OSM entity records.
//!
//! Entities are frozen values: the streaming builder produces them once and
//! nothing mutates them afterwards. Identity is scoped by kind, so node `5`
//! and way `5` are unrelated entities.

use std::{collections::HashMap, fmt, str::FromStr};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Free-form OSM key/value annotations.
pub type Tags = HashMap<String, String>;

/// The three entity kinds that take part in the reference graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum EntityKind {
    /// A point with coordinates.
    Node,
    /// An ordered path over nodes.
    Way,
    /// An ordered, typed grouping of other entities.
    Relation,
}

impl EntityKind {
    /// Lowercase wire name used by OSM XML `type` attributes.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Node => "node",
            Self::Way => "way",
            Self::Relation => "relation",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a string does not name an [`EntityKind`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown entity kind {value:?} (expected node, way or relation)")]
pub struct UnknownKindError {
    /// The rejected input.
    pub value: String,
}

impl FromStr for EntityKind {
    type Err = UnknownKindError;

    /// Parse a kind name, ignoring ASCII case.
    ///
    /// ```
    /// use osmgraph_core::EntityKind;
    ///
    /// assert_eq!("Way".parse::<EntityKind>(), Ok(EntityKind::Way));
    /// assert!("area".parse::<EntityKind>().is_err());
    /// ```
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        [Self::Node, Self::Way, Self::Relation]
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| UnknownKindError {
                value: value.to_owned(),
            })
    }
}

/// Edit metadata attached to every entity.
///
/// Numeric fields default to `0` when the source omits them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MetaInfo {
    /// Edit version of the entity.
    pub version: u32,
    /// Changeset that produced this version.
    pub changeset: i64,
    /// Edit time as written in the source, usually ISO 8601.
    pub timestamp: Option<String>,
    /// Display name of the editing user.
    pub user: Option<String>,
    /// Numeric id of the editing user.
    pub uid: i64,
}

impl MetaInfo {
    /// Flatten the metadata into `osm_`-prefixed string entries.
    ///
    /// Absent `timestamp` and `user` values are omitted.
    ///
    /// ```
    /// use osmgraph_core::MetaInfo;
    ///
    /// let meta = MetaInfo { version: 3, uid: 42, ..MetaInfo::default() };
    /// let map = meta.as_map();
    /// assert_eq!(map.get("osm_version").map(String::as_str), Some("3"));
    /// assert!(!map.contains_key("osm_userName"));
    /// ```
    #[must_use]
    pub fn as_map(&self) -> HashMap<&'static str, String> {
        let mut map = HashMap::from([
            ("osm_version", self.version.to_string()),
            ("osm_changesetId", self.changeset.to_string()),
            ("osm_userId", self.uid.to_string()),
        ]);
        if let Some(timestamp) = &self.timestamp {
            map.insert("osm_timestamp", timestamp.clone());
        }
        if let Some(user) = &self.user {
            map.insert("osm_userName", user.clone());
        }
        map
    }
}

/// A point entity. Coordinates are WGS84 degrees.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Node {
    /// Node id, unique among nodes.
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

/// A path entity referencing nodes by id.
///
/// `node_ids` keeps the declared order; repeats (closed rings) and empty
/// lists are valid.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Way {
    /// Way id, unique among ways.
    pub id: i64,
    /// Edit metadata.
    pub meta: MetaInfo,
    /// Key/value annotations.
    pub tags: Tags,
    /// Referenced node ids in path order.
    pub node_ids: Vec<i64>,
}

/// Typed reference from a relation member to its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum MemberRef {
    /// Reference to a node id.
    Node(i64),
    /// Reference to a way id.
    Way(i64),
    /// Reference to a relation id.
    Relation(i64),
}

impl MemberRef {
    /// Build a reference from a kind and an id.
    #[must_use]
    pub const fn new(kind: EntityKind, id: i64) -> Self {
        match kind {
            EntityKind::Node => Self::Node(id),
            EntityKind::Way => Self::Way(id),
            EntityKind::Relation => Self::Relation(id),
        }
    }

    /// Kind of the referenced entity.
    #[must_use]
    pub const fn kind(self) -> EntityKind {
        match self {
            Self::Node(_) => EntityKind::Node,
            Self::Way(_) => EntityKind::Way,
            Self::Relation(_) => EntityKind::Relation,
        }
    }

    /// Id of the referenced entity.
    #[must_use]
    pub const fn id(self) -> i64 {
        match self {
            Self::Node(id) | Self::Way(id) | Self::Relation(id) => id,
        }
    }
}

/// One ordered entry of a relation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Member {
    /// Kind and id of the target entity.
    pub reference: MemberRef,
    /// Role label; empty when the source omitted it.
    pub role: String,
}

impl Member {
    /// Create a member from its reference and role.
    pub fn new(reference: MemberRef, role: impl Into<String>) -> Self {
        Self {
            reference,
            role: role.into(),
        }
    }

    /// Whether the member is a way forming the outer ring of an area.
    ///
    /// Blank roles count as outer, matching common multipolygon tagging.
    #[must_use]
    pub fn is_outer_way(&self) -> bool {
        let role = self.role.trim();
        matches!(self.reference, MemberRef::Way(_)) && (role.is_empty() || role == "outer")
    }
}

/// An ordered grouping of typed members.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Relation {
    /// Relation id, unique among relations.
    pub id: i64,
    /// Edit metadata.
    pub meta: MetaInfo,
    /// Key/value annotations.
    pub tags: Tags,
    /// Members in declared order. Duplicates are kept.
    pub members: Vec<Member>,
}

/// Any of the three graph entities.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(tag = "kind", rename_all = "lowercase")
)]
pub enum Entity {
    /// A node.
    Node(Node),
    /// A way.
    Way(Way),
    /// A relation.
    Relation(Relation),
}

impl Entity {
    /// Kind of the wrapped entity.
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        match self {
            Self::Node(_) => EntityKind::Node,
            Self::Way(_) => EntityKind::Way,
            Self::Relation(_) => EntityKind::Relation,
        }
    }

    /// Id of the wrapped entity.
    #[must_use]
    pub const fn id(&self) -> i64 {
        match self {
            Self::Node(node) => node.id,
            Self::Way(way) => way.id,
            Self::Relation(relation) => relation.id,
        }
    }

    /// Tags of the wrapped entity.
    #[must_use]
    pub const fn tags(&self) -> &Tags {
        match self {
            Self::Node(node) => &node.tags,
            Self::Way(way) => &way.tags,
            Self::Relation(relation) => &relation.tags,
        }
    }

    /// Metadata of the wrapped entity.
    #[must_use]
    pub const fn meta(&self) -> &MetaInfo {
        match self {
            Self::Node(node) => &node.meta,
            Self::Way(way) => &way.meta,
            Self::Relation(relation) => &relation.meta,
        }
    }
}

impl From<Node> for Entity {
    fn from(node: Node) -> Self {
        Self::Node(node)
    }
}

impl From<Way> for Entity {
    fn from(way: Way) -> Self {
        Self::Way(way)
    }
}

impl From<Relation> for Entity {
    fn from(relation: Relation) -> Self {
        Self::Relation(relation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("node", EntityKind::Node)]
    #[case("WAY", EntityKind::Way)]
    #[case("Relation", EntityKind::Relation)]
    fn kind_parsing_ignores_case(#[case] input: &str, #[case] expected: EntityKind) {
        assert_eq!(input.parse::<EntityKind>(), Ok(expected));
    }

    #[rstest]
    fn kind_parsing_rejects_unknown_names() {
        let err = "changeset".parse::<EntityKind>().expect_err("unknown kind");
        assert_eq!(err.value, "changeset");
    }

    #[rstest]
    #[case(MemberRef::Way(1), "", true)]
    #[case(MemberRef::Way(1), "  ", true)]
    #[case(MemberRef::Way(1), "outer", true)]
    #[case(MemberRef::Way(1), "inner", false)]
    #[case(MemberRef::Node(1), "", false)]
    #[case(MemberRef::Relation(1), "outer", false)]
    fn outer_way_detection(#[case] reference: MemberRef, #[case] role: &str, #[case] outer: bool) {
        assert_eq!(Member::new(reference, role).is_outer_way(), outer);
    }

    #[rstest]
    fn member_ref_round_trips_kind_and_id() {
        let reference = MemberRef::new(EntityKind::Relation, 77);
        assert_eq!(reference, MemberRef::Relation(77));
        assert_eq!(reference.kind(), EntityKind::Relation);
        assert_eq!(reference.id(), 77);
    }

    #[rstest]
    fn meta_map_includes_present_fields() {
        let meta = MetaInfo {
            version: 2,
            changeset: 900,
            timestamp: Some("2024-01-01T00:00:00Z".into()),
            user: Some("mapper".into()),
            uid: 7,
        };
        let map = meta.as_map();
        assert_eq!(map.len(), 5);
        assert_eq!(map.get("osm_changesetId").map(String::as_str), Some("900"));
        assert_eq!(map.get("osm_userName").map(String::as_str), Some("mapper"));
    }

    #[rstest]
    fn entity_accessors_follow_variant() {
        let way = Way {
            id: 10,
            meta: MetaInfo::default(),
            tags: Tags::from([("highway".into(), "service".into())]),
            node_ids: vec![1, 2, 3],
        };
        let entity = Entity::from(way);
        assert_eq!(entity.kind(), EntityKind::Way);
        assert_eq!(entity.id(), 10);
        assert_eq!(entity.tags().get("highway").map(String::as_str), Some("service"));
    }
}
