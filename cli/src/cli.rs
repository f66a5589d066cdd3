//! Command line definitions for `geocrop`

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use shared::reports::DateRange;

/// Manage locally stored GeoCrop farms and predictions
#[derive(Parser, Debug)]
#[command(name = "geocrop", version)]
pub struct Cli {
    /// Data file to use instead of `storage.data_file`
    #[arg(long, global = true)]
    pub data_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Saved crop predictions
    #[command(subcommand)]
    History(HistoryCommand),

    /// Registered farms
    #[command(subcommand)]
    Farms(FarmsCommand),

    /// Estimate the area of a boundary given as a JSON point array
    Area {
        /// e.g. '[{"lat":28.61,"lng":77.20},...]'
        points: String,
    },

    /// Filtered prediction report as CSV
    Report(ReportArgs),

    /// Dump every stored key as JSON
    Export {
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Restore a previous export
    Import { file: PathBuf },
}

#[derive(Subcommand, Debug)]
pub enum HistoryCommand {
    /// List predictions, newest first
    List,
    /// Print one prediction as JSON
    Show { id: String },
    /// Delete one prediction
    Delete { id: String },
    /// Delete every prediction
    Clear,
    /// Keep only the newest N predictions
    Prune { max_entries: usize },
    /// Number of saved predictions
    Count,
}

#[derive(Subcommand, Debug)]
pub enum FarmsCommand {
    /// List registered farms
    List,
    /// Register a farm
    Add {
        #[arg(long)]
        name: String,
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lng: f64,
        #[arg(long)]
        soil_type: Option<String>,
        /// Boundary as a JSON point array
        #[arg(long)]
        boundary: Option<String>,
    },
    /// Remove a farm by id
    Remove { id: i64 },
    /// Total measured area of all farms
    Area,
}

#[derive(Args, Debug, Default)]
pub struct ReportArgs {
    /// Match crop or farm names containing this text
    #[arg(long)]
    pub search: Option<String>,
    #[arg(long)]
    pub crop: Option<String>,
    #[arg(long)]
    pub farm: Option<String>,
    /// all, week, month or quarter
    #[arg(long, default_value = "all")]
    pub range: DateRange,
    /// Write the CSV here and print a summary instead
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}
