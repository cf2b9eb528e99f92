//! Command-line interface for building and querying OSM entity databases.
//!
//! Two subcommands are provided:
//! - `ingest` streams an OSM XML extract into a SQLite entity database.
//! - `hydrate` resolves one entity from such a database into a nested JSON
//!   tree on stdout.
#![forbid(unsafe_code)]

use camino::Utf8Path;
use clap::{Parser, Subcommand};
use log::LevelFilter;

mod error;
mod hydrate;
mod ingest;
mod logging;

pub use error::CliError;
use hydrate::{HydrateArgs, run_hydrate};
use ingest::{IngestArgs, run_ingest};

pub(crate) const ARG_OSM_XML: &str = "osm-xml";
pub(crate) const ARG_DATABASE: &str = "database";
pub(crate) const ARG_KIND: &str = "kind";
pub(crate) const ARG_ID: &str = "id";
pub(crate) const ENV_INGEST_OSM_XML: &str = "OSMGRAPH_CMDS_INGEST_OSM_XML";
pub(crate) const ENV_INGEST_DATABASE: &str = "OSMGRAPH_CMDS_INGEST_DATABASE";
pub(crate) const ENV_HYDRATE_DATABASE: &str = "OSMGRAPH_CMDS_HYDRATE_DATABASE";
pub(crate) const ENV_HYDRATE_KIND: &str = "OSMGRAPH_CMDS_HYDRATE_KIND";
pub(crate) const ENV_HYDRATE_ID: &str = "OSMGRAPH_CMDS_HYDRATE_ID";
pub(crate) const ENV_LOG_LEVEL: &str = "OSMGRAPH_LOG_LEVEL";

/// Run the CLI with the current process arguments and environment.
///
/// # Errors
///
/// Returns a [`CliError`] describing the first failure; `--help` and
/// `--version` surface as [`CliError::ArgumentParsing`].
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    logging::init(cli.log_level);
    match cli.command {
        Command::Ingest(args) => run_ingest(args).map(|_| ()),
        Command::Hydrate(args) => run_hydrate(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "osmgraph",
    about = "Ingest OSM XML extracts and hydrate stored entity graphs",
    version
)]
struct Cli {
    /// Minimum level of the JSON log lines written to stderr.
    #[arg(
        long = "log-level",
        env = ENV_LOG_LEVEL,
        value_name = "level",
        default_value = "info",
        value_parser = parse_level,
        global = true
    )]
    log_level: LevelFilter,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Load an OSM XML extract into an entity database.
    Ingest(IngestArgs),
    /// Print one stored entity with every reference resolved.
    Hydrate(HydrateArgs),
}

fn parse_level(raw: &str) -> Result<LevelFilter, String> {
    raw.parse().map_err(|_| {
        format!("unknown log level {raw:?} (expected off, error, warn, info, debug or trace)")
    })
}

/// Check that a configured input exists and is a regular file.
pub(crate) fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    match osmgraph_data::is_regular_file(path) {
        Ok(true) => Ok(()),
        Ok(false) => Err(CliError::SourcePathNotFile {
            field,
            path: path.to_path_buf(),
        }),
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
            Err(CliError::MissingSourceFile {
                field,
                path: path.to_path_buf(),
            })
        }
        Err(source) => Err(CliError::InspectSourcePath {
            field,
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests;
