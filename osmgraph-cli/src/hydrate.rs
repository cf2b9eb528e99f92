//! Hydrate command implementation for the osmgraph CLI.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use log::debug;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use osmgraph_core::{Bean, EntityKind, Hydrator};
use osmgraph_data::SqliteEntityStore;
use serde::{Deserialize, Serialize};

use crate::{
    ARG_DATABASE, ARG_ID, ARG_KIND, CliError, ENV_HYDRATE_DATABASE, ENV_HYDRATE_ID,
    ENV_HYDRATE_KIND, require_existing,
};

/// CLI arguments for the `hydrate` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Resolve one stored node, way or relation into a nested \
                 tree and print it as JSON. Dangling references appear as \
                 missing members and relation loops as cycle markers.",
    about = "Print one stored entity with every reference resolved"
)]
#[ortho_config(prefix = "OSMGRAPH")]
pub(crate) struct HydrateArgs {
    /// Path to a database written by `ingest`.
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
    /// Kind of the root entity: node, way or relation.
    #[arg(long = ARG_KIND, value_name = "kind")]
    #[serde(default)]
    pub(crate) kind: Option<EntityKind>,
    /// Id of the root entity.
    #[arg(long = ARG_ID, value_name = "id", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) id: Option<i64>,
}

impl HydrateArgs {
    pub(crate) fn into_config(self) -> Result<HydrateConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        HydrateConfig::try_from(merged)
    }
}

/// Resolved `hydrate` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct HydrateConfig {
    pub(crate) database: Utf8PathBuf,
    pub(crate) kind: EntityKind,
    pub(crate) id: i64,
}

impl HydrateConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        require_existing(&self.database, ARG_DATABASE)
    }
}

impl TryFrom<HydrateArgs> for HydrateConfig {
    type Error = CliError;

    fn try_from(args: HydrateArgs) -> Result<Self, Self::Error> {
        let database = args.database.ok_or(CliError::MissingArgument {
            field: ARG_DATABASE,
            env: ENV_HYDRATE_DATABASE,
        })?;
        let kind = args.kind.ok_or(CliError::MissingArgument {
            field: ARG_KIND,
            env: ENV_HYDRATE_KIND,
        })?;
        let id = args.id.ok_or(CliError::MissingArgument {
            field: ARG_ID,
            env: ENV_HYDRATE_ID,
        })?;
        Ok(Self { database, kind, id })
    }
}

/// Deepest relation nesting printed as JSON. Serialisation recurses once per
/// level, so deeper trees are refused instead of exhausting the stack.
pub(crate) const MAX_PRINTED_DEPTH: usize = 128;

pub(crate) fn run_hydrate(args: HydrateArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_hydrate_with(args, &mut stdout)
}

pub(crate) fn run_hydrate_with(args: HydrateArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    let bean = hydrate_from_database(&config)?;
    ensure_printable(&bean)?;
    write_bean(writer, &bean)
}

pub(crate) fn hydrate_from_database(config: &HydrateConfig) -> Result<Bean, CliError> {
    let store = SqliteEntityStore::open_read_only(&config.database).map_err(|source| {
        CliError::OpenStore {
            path: config.database.clone(),
            source,
        }
    })?;
    debug!("Hydrating {} {} from {}", config.kind, config.id, config.database);
    Hydrator::new(&store)
        .hydrate(config.kind, config.id)?
        .ok_or(CliError::NotFound {
            kind: config.kind,
            id: config.id,
        })
}

fn ensure_printable(bean: &Bean) -> Result<(), CliError> {
    let Bean::Relation(relation) = bean else {
        return Ok(());
    };
    let depth = relation.depth();
    if depth > MAX_PRINTED_DEPTH {
        return Err(CliError::TooDeep {
            kind: bean.kind(),
            id: bean.id(),
            depth,
            limit: MAX_PRINTED_DEPTH,
        });
    }
    Ok(())
}

fn write_bean(writer: &mut dyn Write, bean: &Bean) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(bean).map_err(CliError::SerialiseBean)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<HydrateConfig, CliError> {
    let merged = HydrateArgs::merge_from_layers(layers).map_err(CliError::from)?;
    HydrateConfig::try_from(merged)
}
