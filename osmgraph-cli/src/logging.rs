//! Process-wide JSON logging on stderr.
//!
//! Library crates only emit through the `log` facade; the binary decides
//! where records go. Stdout stays reserved for command output.

use std::io;

use log::LevelFilter;
use structured_logger::{Builder, json::new_writer};

/// Install the JSON logger for every target at `level`.
pub(crate) fn init(level: LevelFilter) {
    Builder::with_level(level.as_str())
        .with_target_writer("*", new_writer(io::stderr()))
        .init();
}
