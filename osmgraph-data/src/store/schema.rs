//! Table layout for persisted entities.
//!
//! Each kind gets its own table keyed by id, so node `5` and way `5` never
//! collide. Metadata, tags, way node lists and relation members are stored
//! as JSON text.

use rusqlite::{Connection, OptionalExtension, Transaction};

use super::SqliteStoreError;

/// Version recorded in `osmgraph_schema_version`.
pub const SCHEMA_VERSION: i64 = 1;

/// Create the entity tables inside `connection` and record the version.
///
/// Re-running against an up-to-date database is a no-op.
///
/// # Errors
///
/// [`SqliteStoreError::CreateSchema`] when a statement fails and
/// [`SqliteStoreError::VersionMismatch`] when the database was written by a
/// different schema version.
///
/// # Examples
/// ```
/// use osmgraph_data::store::schema::{SCHEMA_VERSION, initialise_schema};
/// use rusqlite::Connection;
///
/// let mut conn = Connection::open_in_memory().expect("create in-memory database");
/// initialise_schema(&mut conn).expect("create entity schema");
/// initialise_schema(&mut conn).expect("schema creation is idempotent");
///
/// let version: i64 = conn
///     .query_row("SELECT version FROM osmgraph_schema_version", [], |row| row.get(0))
///     .expect("read schema version");
/// assert_eq!(version, SCHEMA_VERSION);
/// ```
pub fn initialise_schema(connection: &mut Connection) -> Result<(), SqliteStoreError> {
    let transaction = connection
        .transaction()
        .map_err(|source| SqliteStoreError::CreateSchema {
            step: "begin schema transaction",
            source,
        })?;

    create_tables(&transaction)?;
    ensure_schema_version(&transaction)?;

    transaction
        .commit()
        .map_err(|source| SqliteStoreError::CreateSchema {
            step: "commit schema transaction",
            source,
        })
}

fn create_tables(transaction: &Transaction<'_>) -> Result<(), SqliteStoreError> {
    run_schema_step(
        transaction,
        "create nodes",
        "CREATE TABLE IF NOT EXISTS nodes (
            id INTEGER PRIMARY KEY,
            meta TEXT NOT NULL,
            tags TEXT NOT NULL,
            lat REAL NOT NULL,
            lon REAL NOT NULL
        )",
    )?;
    run_schema_step(
        transaction,
        "create ways",
        "CREATE TABLE IF NOT EXISTS ways (
            id INTEGER PRIMARY KEY,
            meta TEXT NOT NULL,
            tags TEXT NOT NULL,
            node_ids TEXT NOT NULL
        )",
    )?;
    run_schema_step(
        transaction,
        "create relations",
        "CREATE TABLE IF NOT EXISTS relations (
            id INTEGER PRIMARY KEY,
            meta TEXT NOT NULL,
            tags TEXT NOT NULL,
            members TEXT NOT NULL
        )",
    )
}

fn ensure_schema_version(transaction: &Transaction<'_>) -> Result<(), SqliteStoreError> {
    run_schema_step(
        transaction,
        "create schema version table",
        "CREATE TABLE IF NOT EXISTS osmgraph_schema_version (
            version INTEGER PRIMARY KEY CHECK (version > 0)
        ) WITHOUT ROWID",
    )?;

    let existing: Option<i64> = transaction
        .query_row(
            "SELECT version FROM osmgraph_schema_version LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()
        .map_err(|source| SqliteStoreError::CreateSchema {
            step: "read schema version",
            source,
        })?;

    match existing {
        Some(version) if version == SCHEMA_VERSION => Ok(()),
        Some(found) => Err(SqliteStoreError::VersionMismatch {
            expected: SCHEMA_VERSION,
            found,
        }),
        None => transaction
            .execute(
                "INSERT INTO osmgraph_schema_version (version) VALUES (?1)",
                [SCHEMA_VERSION],
            )
            .map(|_| ())
            .map_err(|source| SqliteStoreError::CreateSchema {
                step: "record schema version",
                source,
            }),
    }
}

fn run_schema_step(
    transaction: &Transaction<'_>,
    step: &'static str,
    sql: &str,
) -> Result<(), SqliteStoreError> {
    transaction
        .execute(sql, [])
        .map(|_| ())
        .map_err(|source| SqliteStoreError::CreateSchema { step, source })
}

/// Confirm that an existing database was written with [`SCHEMA_VERSION`].
///
/// Used for read-only connections, which cannot create tables.
///
/// # Errors
///
/// [`SqliteStoreError::Query`] when the version cannot be read (for example
/// because the file is not an entity database) and
/// [`SqliteStoreError::VersionMismatch`] when it differs.
pub fn check_schema_version(connection: &Connection) -> Result<(), SqliteStoreError> {
    let found: i64 = connection
        .query_row(
            "SELECT version FROM osmgraph_schema_version LIMIT 1",
            [],
            |row| row.get(0),
        )
        .map_err(|source| SqliteStoreError::Query {
            operation: "read schema version",
            source,
        })?;
    if found == SCHEMA_VERSION {
        Ok(())
    } else {
        Err(SqliteStoreError::VersionMismatch {
            expected: SCHEMA_VERSION,
            found,
        })
    }
}
