//! `quick-xml` adapter feeding [`EntityBuilder`].

use std::{borrow::Cow, collections::VecDeque, io::BufRead};

use quick_xml::{
    Reader,
    events::{BytesStart, Event, attributes::AttrError},
};
use thiserror::Error;

use super::{Attributes, BuildError, EntityBuilder, OsmEvent};

/// Errors raised while reading an OSM XML document.
///
/// Positions are byte offsets into the input.
#[derive(Debug, Error)]
pub enum OsmReadError {
    /// The input is not well-formed XML.
    #[error("malformed XML near byte {position}")]
    Xml {
        /// Reader position when the error surfaced.
        position: u64,
        #[source]
        source: quick_xml::Error,
    },
    /// An attribute list could not be tokenised.
    #[error("malformed attribute near byte {position}")]
    Attribute {
        /// Reader position when the error surfaced.
        position: u64,
        #[source]
        source: AttrError,
    },
    /// An element violated the entity grammar.
    #[error("invalid OSM element near byte {position}")]
    Build {
        /// Reader position when the error surfaced.
        position: u64,
        #[source]
        source: BuildError,
    },
}

/// Iterator of [`OsmEvent`]s read from an XML source.
///
/// The last item of a successful read is
/// [`OsmEvent::DocumentCompleted`]. After the first error the iterator is
/// exhausted.
///
/// # Examples
///
/// ```
/// use osmgraph_data::ingest::{OsmEvent, OsmXmlEvents};
///
/// let xml = r#"<osm><way id="10"><nd ref="1"/><nd ref="2"/><nd ref="3"/></way></osm>"#;
/// let events: Vec<_> = OsmXmlEvents::from_reader(xml.as_bytes())
///     .collect::<Result<_, _>>()
///     .expect("valid document");
///
/// let OsmEvent::WayParsed(way) = &events[0] else { panic!("expected a way") };
/// assert_eq!(way.node_ids, vec![1, 2, 3]);
/// assert!(matches!(events[1], OsmEvent::DocumentCompleted(counts) if counts.ways == 1));
/// ```
#[derive(Debug)]
pub struct OsmXmlEvents<R> {
    reader: Reader<R>,
    buf: Vec<u8>,
    builder: EntityBuilder,
    pending: VecDeque<OsmEvent>,
    done: bool,
}

impl<R: BufRead> OsmXmlEvents<R> {
    /// Wrap a buffered reader positioned at the start of a document.
    pub fn from_reader(reader: R) -> Self {
        let mut reader = Reader::from_reader(reader);
        reader.config_mut().trim_text(true);
        Self {
            reader,
            buf: Vec::new(),
            builder: EntityBuilder::new(),
            pending: VecDeque::new(),
            done: false,
        }
    }

    fn advance(&mut self) -> Result<Option<OsmEvent>, OsmReadError> {
        loop {
            self.buf.clear();
            let event = self
                .reader
                .read_event_into(&mut self.buf)
                .map_err(|source| OsmReadError::Xml {
                    position: self.reader.buffer_position(),
                    source,
                })?;
            let position = self.reader.buffer_position();
            let build = |source| OsmReadError::Build { position, source };
            match event {
                Event::Start(element) => {
                    let (name, attributes) = decode_start(&element, position)?;
                    if let Some(parsed) = self.builder.start_element(&name, &attributes).map_err(build)? {
                        return Ok(Some(parsed));
                    }
                }
                Event::Empty(element) => {
                    let (name, attributes) = decode_start(&element, position)?;
                    let opened = self.builder.start_element(&name, &attributes).map_err(build)?;
                    let closed = self.builder.end_element(&name);
                    let mut produced = opened.into_iter().chain(closed);
                    if let Some(first) = produced.next() {
                        self.pending.extend(produced);
                        return Ok(Some(first));
                    }
                }
                Event::End(element) => {
                    let name = String::from_utf8_lossy(element.name().as_ref()).into_owned();
                    if let Some(parsed) = self.builder.end_element(&name) {
                        return Ok(Some(parsed));
                    }
                }
                Event::Eof => {
                    self.done = true;
                    return self.builder.finish().map(Some).map_err(build);
                }
                _ => {}
            }
        }
    }
}

impl<R: BufRead> Iterator for OsmXmlEvents<R> {
    type Item = Result<OsmEvent, OsmReadError>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(event) = self.pending.pop_front() {
            return Some(Ok(event));
        }
        if self.done {
            return None;
        }
        match self.advance() {
            Ok(event) => event.map(Ok),
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

fn decode_start(
    element: &BytesStart<'_>,
    position: u64,
) -> Result<(String, Attributes), OsmReadError> {
    let name = String::from_utf8_lossy(element.name().as_ref()).into_owned();
    let mut attributes = Attributes::new();
    for attribute in element.attributes() {
        let attribute =
            attribute.map_err(|source| OsmReadError::Attribute { position, source })?;
        let key: Cow<'_, str> = String::from_utf8_lossy(attribute.key.as_ref());
        let value = attribute
            .unescape_value()
            .map_err(|source| OsmReadError::Xml { position, source })?;
        attributes.insert(key, value);
    }
    Ok((name, attributes))
}
