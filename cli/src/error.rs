//! Error handling for the GeoCrop command line tool

use shared::farms::FarmError;
use shared::geometry::GeometryError;
use shared::reports::ReportError;
use shared::storage::StorageError;
use thiserror::Error;

/// Command error types
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] config::ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Farm(#[from] FarmError),

    #[error("Invalid boundary: {0}")]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error("{0} not found")]
    NotFound(String),
}

/// Result type alias for commands
pub type CliResult<T> = Result<T, CliError>;
