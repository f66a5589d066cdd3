//! Command implementations
//!
//! Commands write their results to the given writer; diagnostics go through
//! `tracing` to stderr.

use std::io::Write;

use crate::cli::{Cli, Command};
use crate::config::Config;
use crate::error::CliResult;
use crate::storage::FileStorage;

pub mod data;
pub mod farms;
pub mod history;
pub mod report;

/// Run a parsed command line against the configured data file
pub fn execute<W: Write>(cli: Cli, config: &Config, out: &mut W) -> CliResult<()> {
    let Cli { data_file, command } = cli;
    let open = || FileStorage::open(data_file.unwrap_or_else(|| config.storage.data_file.clone()));

    match command {
        // Area estimation never touches stored data
        Command::Area { points } => farms::estimate_area(&points, out),
        Command::History(command) => history::run(command, &open()?, config, out),
        Command::Farms(command) => farms::run(command, &open()?, out),
        Command::Report(args) => report::run(&args, &open()?, config, out),
        Command::Export { output } => data::export(&open()?, output.as_deref(), out),
        Command::Import { file } => data::import(&open()?, &file, out),
    }
}
