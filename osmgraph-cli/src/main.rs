//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use osmgraph_cli::CliError;

fn main() {
    match osmgraph_cli::run() {
        Ok(()) => {}
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        Err(err) => {
            eprintln!("osmgraph: {err}");
            std::process::exit(1);
        }
    }
}
