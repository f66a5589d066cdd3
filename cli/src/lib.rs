//! GeoCrop command line tool
//!
//! Manages the same farm registry, prediction history and exports the web
//! client keeps in `localStorage`, backed by a local JSON data file.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod storage;

pub use cli::Cli;
pub use commands::execute;
pub use config::Config;
pub use error::{CliError, CliResult};
pub use storage::FileStorage;
