//! SQLite-backed entity store.

use camino::Utf8Path;
use log::{debug, info, warn};
use osmgraph_core::{
    Entity, EntityKind, EntityStore, LookupError, Member, MetaInfo, Node, Relation, Tags, Way,
};
use rusqlite::{Connection, OpenFlags, OptionalExtension, params};
use serde::{Serialize, de::DeserializeOwned};

use super::{
    SqliteStoreError,
    schema::{check_schema_version, initialise_schema},
};
use crate::{OsmEvent, OsmSink, fs::ensure_parent_dir};

/// Entity store persisted in a single SQLite database.
///
/// As an [`OsmSink`] it writes every parsed entity with `INSERT OR REPLACE`,
/// so re-ingesting a document overwrites earlier copies. Writes for one
/// document are batched in a transaction that opens with the first entity
/// and commits on [`OsmEvent::DocumentCompleted`]. If ingestion fails part
/// way, [`OsmSink::abort`] rolls the batch back, so none of the failed
/// document's entities become visible.
///
/// # Examples
/// ```
/// use osmgraph_core::{EntityKind, EntityStore};
/// use osmgraph_data::{SqliteEntityStore, ingest_reader};
///
/// let mut store = SqliteEntityStore::open_in_memory().expect("create store");
/// let xml = r#"<osm><node id="1" lat="1" lon="2"/><way id="7"><nd ref="1"/></way></osm>"#;
/// ingest_reader(xml.as_bytes(), &mut store).expect("ingest");
///
/// assert_eq!(store.count(EntityKind::Way).expect("count ways"), 1);
/// assert!(store.get(EntityKind::Node, 1).expect("lookup").is_some());
/// ```
#[derive(Debug)]
pub struct SqliteEntityStore {
    pub(super) connection: Connection,
}

impl SqliteEntityStore {
    /// Open or create a database at `path`, creating parent directories and
    /// tables as needed.
    ///
    /// # Errors
    ///
    /// [`SqliteStoreError::CreateDirectory`], [`SqliteStoreError::Open`] or
    /// any schema error from [`initialise_schema`].
    pub fn open(path: &Utf8Path) -> Result<Self, SqliteStoreError> {
        ensure_parent_dir(path).map_err(|source| SqliteStoreError::CreateDirectory {
            path: path.to_path_buf(),
            source,
        })?;
        let connection = Connection::open(path).map_err(|source| SqliteStoreError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Self::initialised(connection)
    }

    /// Open an existing database for lookups only.
    ///
    /// # Errors
    ///
    /// [`SqliteStoreError::Open`] when the file cannot be opened, or a
    /// version error when it is not a compatible entity database.
    pub fn open_read_only(path: &Utf8Path) -> Result<Self, SqliteStoreError> {
        let connection = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|source| SqliteStoreError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        check_schema_version(&connection)?;
        Ok(Self { connection })
    }

    /// Create a private in-memory database.
    ///
    /// # Errors
    ///
    /// Fails only when SQLite cannot allocate the database or its schema.
    pub fn open_in_memory() -> Result<Self, SqliteStoreError> {
        let connection =
            Connection::open_in_memory().map_err(|source| SqliteStoreError::Open {
                path: ":memory:".into(),
                source,
            })?;
        Self::initialised(connection)
    }

    fn initialised(mut connection: Connection) -> Result<Self, SqliteStoreError> {
        initialise_schema(&mut connection)?;
        Ok(Self { connection })
    }

    /// Write one entity, replacing any stored entity of the same kind and id.
    ///
    /// # Errors
    ///
    /// [`SqliteStoreError::Serialize`] or [`SqliteStoreError::Persist`].
    pub fn insert(&self, entity: &Entity) -> Result<(), SqliteStoreError> {
        let kind = entity.kind();
        let id = entity.id();
        let meta = encode(kind, id, entity.meta())?;
        let tags = encode(kind, id, entity.tags())?;
        let written = match entity {
            Entity::Node(node) => self
                .connection
                .prepare_cached(
                    "INSERT OR REPLACE INTO nodes (id, meta, tags, lat, lon)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                )
                .and_then(|mut stmt| {
                    stmt.execute(params![id, meta, tags, node.latitude, node.longitude])
                }),
            Entity::Way(way) => {
                let node_ids = encode(kind, id, &way.node_ids)?;
                self.connection
                    .prepare_cached(
                        "INSERT OR REPLACE INTO ways (id, meta, tags, node_ids)
                         VALUES (?1, ?2, ?3, ?4)",
                    )
                    .and_then(|mut stmt| stmt.execute(params![id, meta, tags, node_ids]))
            }
            Entity::Relation(relation) => {
                let members = encode(kind, id, &relation.members)?;
                self.connection
                    .prepare_cached(
                        "INSERT OR REPLACE INTO relations (id, meta, tags, members)
                         VALUES (?1, ?2, ?3, ?4)",
                    )
                    .and_then(|mut stmt| stmt.execute(params![id, meta, tags, members]))
            }
        };
        written
            .map(|_| ())
            .map_err(|source| SqliteStoreError::Persist { kind, id, source })
    }

    /// Number of stored entities of `kind`.
    ///
    /// # Errors
    ///
    /// [`SqliteStoreError::Query`] when the count fails.
    pub fn count(&self, kind: EntityKind) -> Result<u64, SqliteStoreError> {
        let sql = format!("SELECT COUNT(*) FROM {}", table(kind));
        self.connection
            .query_row(&sql, [], |row| row.get::<_, i64>(0))
            .map(|count| u64::try_from(count).unwrap_or_default())
            .map_err(|source| SqliteStoreError::Query {
                operation: "count entities",
                source,
            })
    }

    /// Remove every stored node, way and relation.
    ///
    /// # Errors
    ///
    /// [`SqliteStoreError::Query`] when a delete fails.
    pub fn clear(&mut self) -> Result<(), SqliteStoreError> {
        self.connection
            .execute_batch("DELETE FROM nodes; DELETE FROM ways; DELETE FROM relations;")
            .map_err(|source| SqliteStoreError::Query {
                operation: "clear entity tables",
                source,
            })?;
        info!("Cleared all stored entities");
        Ok(())
    }

    fn begin_batch(&self) -> Result<(), SqliteStoreError> {
        if !self.connection.is_autocommit() {
            return Ok(());
        }
        self.connection
            .execute_batch("BEGIN")
            .map_err(|source| SqliteStoreError::Transaction {
                operation: "begin ingest transaction",
                source,
            })
    }

    fn commit_batch(&self) -> Result<(), SqliteStoreError> {
        if self.connection.is_autocommit() {
            return Ok(());
        }
        self.connection
            .execute_batch("COMMIT")
            .map_err(|source| SqliteStoreError::Transaction {
                operation: "commit ingest transaction",
                source,
            })
    }

    fn rollback_batch(&self) -> Result<(), SqliteStoreError> {
        if self.connection.is_autocommit() {
            return Ok(());
        }
        self.connection
            .execute_batch("ROLLBACK")
            .map_err(|source| SqliteStoreError::Transaction {
                operation: "roll back ingest transaction",
                source,
            })?;
        warn!("Rolled back the entities of an incomplete document");
        Ok(())
    }

    fn load(&self, kind: EntityKind, id: i64) -> Result<Option<Entity>, SqliteStoreError> {
        let sql = match kind {
            EntityKind::Node => "SELECT meta, tags, lat, lon FROM nodes WHERE id = ?1",
            EntityKind::Way => "SELECT meta, tags, node_ids FROM ways WHERE id = ?1",
            EntityKind::Relation => "SELECT meta, tags, members FROM relations WHERE id = ?1",
        };
        let row: Option<StoredRow> = self
            .connection
            .prepare_cached(sql)
            .and_then(|mut stmt| {
                stmt.query_row([id], |row| {
                    let payload = match kind {
                        EntityKind::Node => Payload::Node(row.get(2)?, row.get(3)?),
                        EntityKind::Way => Payload::Way(row.get(2)?),
                        EntityKind::Relation => Payload::Relation(row.get(2)?),
                    };
                    Ok(StoredRow {
                        meta: row.get(0)?,
                        tags: row.get(1)?,
                        payload,
                    })
                })
                .optional()
            })
            .map_err(|source| SqliteStoreError::Query {
                operation: "look up entity",
                source,
            })?;
        let Some(row) = row else {
            return Ok(None);
        };

        let meta: MetaInfo = decode(kind, id, &row.meta)?;
        let tags: Tags = decode(kind, id, &row.tags)?;
        let entity = match row.payload {
            Payload::Node(latitude, longitude) => Entity::Node(Node {
                id,
                meta,
                tags,
                latitude,
                longitude,
            }),
            Payload::Way(node_ids) => Entity::Way(Way {
                id,
                meta,
                tags,
                node_ids: decode(kind, id, &node_ids)?,
            }),
            Payload::Relation(members) => Entity::Relation(Relation {
                id,
                meta,
                tags,
                members: decode::<Vec<Member>>(kind, id, &members)?,
            }),
        };
        Ok(Some(entity))
    }
}

/// Columns shared by every entity table plus the kind-specific remainder.
struct StoredRow {
    meta: String,
    tags: String,
    payload: Payload,
}

enum Payload {
    Node(f64, f64),
    Way(String),
    Relation(String),
}

impl OsmSink for SqliteEntityStore {
    type Error = SqliteStoreError;

    fn on_event(&mut self, event: OsmEvent) -> Result<(), Self::Error> {
        match event {
            OsmEvent::BoundParsed(bound) => {
                debug!("Document covers {bound:?}");
                Ok(())
            }
            OsmEvent::DocumentCompleted(counts) => {
                self.commit_batch()?;
                debug!("Committed {} entities", counts.total());
                Ok(())
            }
            other => {
                self.begin_batch()?;
                match other.into_entity() {
                    Some(entity) => self.insert(&entity),
                    None => Ok(()),
                }
            }
        }
    }

    fn abort(&mut self) -> Result<(), Self::Error> {
        self.rollback_batch()
    }
}

impl EntityStore for SqliteEntityStore {
    fn get(&self, kind: EntityKind, id: i64) -> Result<Option<Entity>, LookupError> {
        self.load(kind, id)
            .map_err(|err| LookupError::new(kind, id, err))
    }
}

const fn table(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Node => "nodes",
        EntityKind::Way => "ways",
        EntityKind::Relation => "relations",
    }
}

fn encode<T: Serialize + ?Sized>(
    kind: EntityKind,
    id: i64,
    value: &T,
) -> Result<String, SqliteStoreError> {
    serde_json::to_string(value).map_err(|source| SqliteStoreError::Serialize { kind, id, source })
}

fn decode<T: DeserializeOwned>(
    kind: EntityKind,
    id: i64,
    text: &str,
) -> Result<T, SqliteStoreError> {
    serde_json::from_str(text).map_err(|source| SqliteStoreError::Decode { kind, id, source })
}
