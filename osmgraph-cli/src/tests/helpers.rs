//! Test helpers for writing extracts and seeding entity databases.

use camino::{Utf8Path, Utf8PathBuf};
use tempfile::TempDir;

use crate::ingest::{IngestConfig, ingest_into_database};

/// Two nodes joined by a way, grouped under relation 20.
pub(super) const STOP_AREA_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<osm version="0.6">
  <node id="1" lat="51.5007" lon="-0.1246"><tag k="name" v="Westminster"/></node>
  <node id="2" lat="51.5010" lon="-0.1250"/>
  <way id="10"><nd ref="1"/><nd ref="2"/><tag k="highway" v="footway"/></way>
  <relation id="20">
    <member type="node" ref="1" role="stop"/>
    <member type="way" ref="10" role="platform"/>
    <tag k="public_transport" v="stop_area"/>
  </relation>
</osm>
"#;

pub(super) fn utf8_tempdir() -> (TempDir, Utf8PathBuf) {
    let tmp = TempDir::new().expect("tempdir");
    let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf-8 workspace");
    (tmp, root)
}

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    std::fs::write(path, contents).unwrap_or_else(|err| {
        panic!("failed to write {path}: {err}");
    });
}

/// Write the stop area extract under `root` and ingest it into `graph.db`.
pub(super) fn seed_database(root: &Utf8Path) -> Utf8PathBuf {
    let osm_xml = root.join("stop_area.osm");
    let database = root.join("graph.db");
    write_utf8(&osm_xml, STOP_AREA_XML.as_bytes());
    ingest_into_database(&IngestConfig {
        osm_xml,
        database: database.clone(),
    })
    .expect("seed database");
    database
}

/// Ingest relations `1..=depth`, each holding the next, into `chain.db`.
pub(super) fn seed_relation_chain(root: &Utf8Path, depth: i64) -> Utf8PathBuf {
    let mut xml = String::from("<osm>");
    for id in 1..depth {
        let next = id + 1;
        xml.push_str(&format!(
            r#"<relation id="{id}"><member type="relation" ref="{next}" role=""/></relation>"#
        ));
    }
    xml.push_str(&format!(r#"<relation id="{depth}"/></osm>"#));
    let osm_xml = root.join("chain.osm");
    let database = root.join("chain.db");
    write_utf8(&osm_xml, xml.as_bytes());
    ingest_into_database(&IngestConfig {
        osm_xml,
        database: database.clone(),
    })
    .expect("seed relation chain");
    database
}
