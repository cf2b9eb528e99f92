//! Streaming conversion of element events into entities.
//!
//! The builder sees one start or end event at a time and never holds more
//! than the element currently open. Any attribute error aborts the stream:
//! callers should stop feeding events after the first `Err`.

use log::{debug, warn};
use osmgraph_core::{Bound, EntityKind, Member, MemberRef, MetaInfo};

use super::{
    BuildError, accumulator::ElementAccumulator, attributes::Attributes, events::DocumentCounts,
    events::OsmEvent,
};

/// Turns `(name, attributes)` start/end events into [`OsmEvent`]s.
///
/// # Examples
///
/// ```
/// use osmgraph_data::ingest::{Attributes, EntityBuilder, OsmEvent};
///
/// # fn main() -> Result<(), osmgraph_data::ingest::BuildError> {
/// let mut builder = EntityBuilder::new();
/// builder.start_element("node", &Attributes::from([("id", "5"), ("lat", "12.5"), ("lon", "77.5")]))?;
/// builder.start_element("tag", &Attributes::from([("k", "created_by"), ("v", "x")]))?;
/// builder.start_element("tag", &Attributes::from([("k", "name"), ("v", "A")]))?;
/// let Some(OsmEvent::NodeParsed(node)) = builder.end_element("node") else {
///     panic!("node should close");
/// };
/// assert_eq!(node.id, 5);
/// assert_eq!(node.tags.len(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct EntityBuilder {
    scratch: ElementAccumulator,
    /// Top-level elements opened while another one was open; ignored.
    nested: usize,
    counts: DocumentCounts,
}

impl EntityBuilder {
    /// Create a builder with no open element and zeroed counts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle the start of an element.
    ///
    /// Returns an event only for elements that are complete on open
    /// (`bounds`).
    ///
    /// # Errors
    ///
    /// [`BuildError::MissingIdentifier`] when a node, way or relation lacks
    /// a numeric `id`, [`BuildError::MalformedAttribute`] for unparseable
    /// attributes, [`BuildError::UnknownMemberType`] for a member `type`
    /// outside node/way/relation and [`BuildError::InvalidBound`] for
    /// out-of-range bounds.
    pub fn start_element(
        &mut self,
        name: &str,
        attributes: &Attributes,
    ) -> Result<Option<OsmEvent>, BuildError> {
        match name {
            "node" | "way" | "relation" => self.open_entity(name, attributes)?,
            "tag" => self.tag(attributes)?,
            "nd" => self.node_ref(attributes)?,
            "member" => self.member(attributes)?,
            "bounds" => {
                let bound = parse_bounds(attributes)?;
                return Ok(Some(OsmEvent::BoundParsed(bound)));
            }
            other => debug!("Skipping <{other}>"),
        }
        Ok(None)
    }

    /// Handle the end of an element, emitting the entity it closes.
    pub fn end_element(&mut self, name: &str) -> Option<OsmEvent> {
        if !matches!(name, "node" | "way" | "relation") {
            return None;
        }
        if self.nested > 0 {
            self.nested -= 1;
            return None;
        }
        if self.scratch.open_kind().map(EntityKind::as_str) != Some(name) {
            return None;
        }
        let entity = self.scratch.take()?;
        debug!("Parsed {} {}", entity.kind(), entity.id());
        match entity.kind() {
            EntityKind::Node => self.counts.nodes += 1,
            EntityKind::Way => self.counts.ways += 1,
            EntityKind::Relation => self.counts.relations += 1,
        }
        Some(OsmEvent::from(entity))
    }

    /// End the document and report what was emitted.
    ///
    /// The builder is reset and may be reused for another document.
    ///
    /// # Errors
    ///
    /// [`BuildError::Unterminated`] when an element is still open.
    pub fn finish(&mut self) -> Result<OsmEvent, BuildError> {
        let open = self.scratch.open();
        let counts = std::mem::take(&mut self.counts);
        self.scratch.reset();
        self.nested = 0;
        if let Some((kind, id)) = open {
            return Err(BuildError::Unterminated { kind, id });
        }
        Ok(OsmEvent::DocumentCompleted(counts))
    }

    /// Entities emitted so far in the current document.
    #[must_use]
    pub const fn counts(&self) -> DocumentCounts {
        self.counts
    }

    fn open_entity(&mut self, name: &str, attributes: &Attributes) -> Result<(), BuildError> {
        if let Some((kind, id)) = self.scratch.open() {
            warn!("Ignoring <{name}> nested inside {kind} {id}");
            self.nested += 1;
            return Ok(());
        }
        let id = parse_id(name, attributes)?;
        let meta = parse_meta(name, attributes)?;
        match name {
            "node" => {
                let latitude = attributes.required(name, "lat")?;
                let longitude = attributes.required(name, "lon")?;
                self.scratch.begin_node(id, meta, latitude, longitude);
            }
            "way" => self.scratch.begin(EntityKind::Way, id, meta),
            _ => self.scratch.begin(EntityKind::Relation, id, meta),
        }
        Ok(())
    }

    /// The open element, unless the current context is being ignored.
    fn context(&self, child: &str) -> Option<(EntityKind, i64)> {
        let open = self.scratch.open();
        if open.is_none() || self.nested > 0 {
            warn!("Ignoring <{child}> outside of a node, way or relation");
            return None;
        }
        open
    }

    fn tag(&mut self, attributes: &Attributes) -> Result<(), BuildError> {
        if self.context("tag").is_none() {
            return Ok(());
        }
        let Some(key) = attributes.text("k") else {
            return Err(BuildError::malformed("tag", "k", None));
        };
        let value = attributes.text("v").unwrap_or_default();
        if !self.scratch.push_tag(key, value) {
            debug!("Dropped created_by tag");
        }
        Ok(())
    }

    fn node_ref(&mut self, attributes: &Attributes) -> Result<(), BuildError> {
        match self.context("nd") {
            Some((EntityKind::Way, _)) => {
                let id = attributes.required("nd", "ref")?;
                self.scratch.push_node_ref(id);
            }
            Some((kind, id)) => warn!("Ignoring <nd> inside {kind} {id}"),
            None => {}
        }
        Ok(())
    }

    fn member(&mut self, attributes: &Attributes) -> Result<(), BuildError> {
        match self.context("member") {
            Some((EntityKind::Relation, _)) => {
                let raw_type = attributes.get("type").unwrap_or_default();
                let kind: EntityKind =
                    raw_type
                        .parse()
                        .map_err(|_| BuildError::UnknownMemberType {
                            value: raw_type.to_owned(),
                        })?;
                let id = attributes.required("member", "ref")?;
                let role = attributes.text("role").unwrap_or_default();
                self.scratch.push_member(Member::new(MemberRef::new(kind, id), role));
            }
            Some((kind, id)) => warn!("Ignoring <member> inside {kind} {id}"),
            None => {}
        }
        Ok(())
    }
}

fn parse_id(element: &str, attributes: &Attributes) -> Result<i64, BuildError> {
    let raw = attributes.get("id");
    raw.and_then(|value| value.trim().parse().ok())
        .ok_or_else(|| BuildError::MissingIdentifier {
            element: element.to_owned(),
            value: raw.map(str::to_owned),
        })
}

fn parse_meta(element: &str, attributes: &Attributes) -> Result<MetaInfo, BuildError> {
    Ok(MetaInfo {
        version: attributes.optional(element, "version")?,
        changeset: attributes.optional(element, "changeset")?,
        timestamp: attributes.text("timestamp"),
        user: attributes.text("user"),
        uid: attributes.optional(element, "uid")?,
    })
}

fn parse_bounds(attributes: &Attributes) -> Result<Bound, BuildError> {
    let bottom = attributes.required("bounds", "minlat")?;
    let left = attributes.required("bounds", "minlon")?;
    let top = attributes.required("bounds", "maxlat")?;
    let right = attributes.required("bounds", "maxlon")?;
    let origin = attributes.text("origin").unwrap_or_default();
    Ok(Bound::new(right, left, top, bottom, origin)?)
}
