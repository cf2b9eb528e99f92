//! Streaming OSM XML ingestion.
//!
//! Responsibilities:
//! - Turn start/end element events into immutable entities
//!   ([`EntityBuilder`]).
//! - Adapt a `quick-xml` reader into that event stream ([`OsmXmlEvents`]).
//!
//! Invariants:
//! - At most one top-level element is buffered at any time.
//! - The first attribute error ends the stream; nothing after it is emitted.

use osmgraph_core::{BoundError, EntityKind};
use thiserror::Error;

mod accumulator;
mod attributes;
mod builder;
mod events;
mod xml;

pub use attributes::Attributes;
pub use builder::EntityBuilder;
pub use events::{DocumentCounts, OsmEvent};
pub use xml::{OsmReadError, OsmXmlEvents};

/// Fatal conditions raised while building entities.
#[derive(Debug, Error)]
pub enum BuildError {
    /// A required attribute is absent or cannot be parsed.
    #[error("malformed `{attribute}` attribute on <{element}>")]
    MalformedAttribute {
        /// Element carrying the attribute.
        element: String,
        /// Attribute name.
        attribute: &'static str,
        /// Raw value, when one was present.
        value: Option<String>,
    },
    /// A node, way or relation has no usable `id`.
    #[error("<{element}> has a missing or non-numeric id")]
    MissingIdentifier {
        /// Element lacking the id.
        element: String,
        /// Raw value, when one was present.
        value: Option<String>,
    },
    /// A member `type` is not node, way or relation.
    #[error("unknown member type {value:?}")]
    UnknownMemberType {
        /// The rejected type string.
        value: String,
    },
    /// A `bounds` element lies outside the valid coordinate range.
    #[error("invalid bounds")]
    InvalidBound(#[from] BoundError),
    /// The document ended while an element was still open.
    #[error("document ended inside {kind} {id}")]
    Unterminated {
        /// Kind of the unclosed element.
        kind: EntityKind,
        /// Id of the unclosed element.
        id: i64,
    },
}

impl BuildError {
    pub(crate) fn malformed(element: &str, attribute: &'static str, value: Option<&str>) -> Self {
        Self::MalformedAttribute {
            element: element.to_owned(),
            attribute,
            value: value.map(str::to_owned),
        }
    }
}
