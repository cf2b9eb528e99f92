//! Typed events produced by the streaming builder.

use osmgraph_core::{Bound, Entity, Node, Relation, Way};
use serde::{Deserialize, Serialize};

/// Number of top-level entities emitted for one document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentCounts {
    /// Nodes emitted.
    pub nodes: u64,
    /// Ways emitted.
    pub ways: u64,
    /// Relations emitted.
    pub relations: u64,
}

impl DocumentCounts {
    /// Sum of all three kinds.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.nodes + self.ways + self.relations
    }
}

/// One completed unit of a parsed document, delivered in document order.
///
/// `DocumentCompleted` is always the last event of a successful parse.
#[derive(Debug, Clone, PartialEq)]
pub enum OsmEvent {
    /// A `node` element closed.
    NodeParsed(Node),
    /// A `way` element closed.
    WayParsed(Way),
    /// A `relation` element closed.
    RelationParsed(Relation),
    /// A `bounds` element was read.
    BoundParsed(Bound),
    /// The document ended.
    DocumentCompleted(DocumentCounts),
}

impl OsmEvent {
    /// The entity carried by this event, if any.
    #[must_use]
    pub fn into_entity(self) -> Option<Entity> {
        match self {
            Self::NodeParsed(node) => Some(Entity::Node(node)),
            Self::WayParsed(way) => Some(Entity::Way(way)),
            Self::RelationParsed(relation) => Some(Entity::Relation(relation)),
            Self::BoundParsed(_) | Self::DocumentCompleted(_) => None,
        }
    }
}

impl From<Entity> for OsmEvent {
    fn from(entity: Entity) -> Self {
        match entity {
            Entity::Node(node) => Self::NodeParsed(node),
            Entity::Way(way) => Self::WayParsed(way),
            Entity::Relation(relation) => Self::RelationParsed(relation),
        }
    }
}
