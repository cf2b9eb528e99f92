//! Ingest command implementation for the osmgraph CLI.

use camino::Utf8PathBuf;
use clap::Parser;
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use osmgraph_data::{DocumentCounts, SqliteEntityStore, ingest_osm_xml};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_DATABASE, ARG_OSM_XML, CliError, ENV_INGEST_DATABASE, ENV_INGEST_OSM_XML,
    require_existing,
};

/// CLI arguments for the `ingest` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Stream an OSM XML extract into a SQLite entity database. \
                 Entities already stored under the same kind and id are \
                 replaced. Paths can come from CLI flags, configuration \
                 files, or environment variables.",
    about = "Load an OSM XML extract into an entity database"
)]
#[ortho_config(prefix = "OSMGRAPH")]
pub(crate) struct IngestArgs {
    /// Path to the OSM XML extract.
    #[arg(long = ARG_OSM_XML, value_name = "path")]
    #[serde(default)]
    pub(crate) osm_xml: Option<Utf8PathBuf>,
    /// Path to the SQLite database to create or update.
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
}

impl IngestArgs {
    pub(crate) fn into_config(self) -> Result<IngestConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        IngestConfig::try_from(merged)
    }
}

/// Resolved `ingest` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct IngestConfig {
    pub(crate) osm_xml: Utf8PathBuf,
    pub(crate) database: Utf8PathBuf,
}

impl IngestConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        require_existing(&self.osm_xml, ARG_OSM_XML)
    }
}

impl TryFrom<IngestArgs> for IngestConfig {
    type Error = CliError;

    fn try_from(args: IngestArgs) -> Result<Self, Self::Error> {
        let osm_xml = args.osm_xml.ok_or(CliError::MissingArgument {
            field: ARG_OSM_XML,
            env: ENV_INGEST_OSM_XML,
        })?;
        let database = args.database.ok_or(CliError::MissingArgument {
            field: ARG_DATABASE,
            env: ENV_INGEST_DATABASE,
        })?;
        Ok(Self { osm_xml, database })
    }
}

pub(crate) fn run_ingest(args: IngestArgs) -> Result<DocumentCounts, CliError> {
    let config = resolve_ingest_config(args)?;
    ingest_into_database(&config)
}

pub(crate) fn resolve_ingest_config(args: IngestArgs) -> Result<IngestConfig, CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    Ok(config)
}

pub(crate) fn ingest_into_database(config: &IngestConfig) -> Result<DocumentCounts, CliError> {
    let mut store =
        SqliteEntityStore::open(&config.database).map_err(|source| CliError::OpenStore {
            path: config.database.clone(),
            source,
        })?;
    let counts =
        ingest_osm_xml(&config.osm_xml, &mut store).map_err(|source| CliError::Ingest {
            path: config.osm_xml.clone(),
            source,
        })?;
    info!(
        "Stored {} entities from {} in {}",
        counts.total(),
        config.osm_xml,
        config.database
    );
    Ok(counts)
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<IngestConfig, CliError> {
    let merged = IngestArgs::merge_from_layers(layers).map_err(CliError::from)?;
    IngestConfig::try_from(merged)
}
