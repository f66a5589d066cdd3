//! `geocrop history`

use std::io::Write;

use shared::history::HistoryStore;
use shared::reports::format_timestamp;
use shared::storage::KeyValueStorage;

use crate::cli::HistoryCommand;
use crate::config::Config;
use crate::error::{CliError, CliResult};

pub fn run<S: KeyValueStorage, W: Write>(
    command: HistoryCommand,
    storage: S,
    config: &Config,
    out: &mut W,
) -> CliResult<()> {
    let store = HistoryStore::with_config(storage, config.history_config());

    match command {
        HistoryCommand::List => {
            let records = store.list();
            if records.is_empty() {
                writeln!(out, "No saved predictions")?;
            }
            for record in &records {
                writeln!(
                    out,
                    "{}  {}  {}  {}",
                    record.id,
                    format_timestamp(record.timestamp),
                    record.farm_name,
                    record.crop().unwrap_or("Unknown"),
                )?;
            }
        }
        HistoryCommand::Show { id } => {
            let record = store
                .get_by_id(&id)
                .ok_or_else(|| CliError::NotFound(format!("Prediction {id}")))?;
            writeln!(out, "{}", serde_json::to_string_pretty(&record)?)?;
        }
        HistoryCommand::Delete { id } => {
            if !store.delete_by_id(&id) {
                return Err(CliError::NotFound(format!("Prediction {id}")));
            }
            writeln!(out, "Deleted {id}")?;
        }
        HistoryCommand::Clear => {
            store.clear();
            writeln!(out, "Prediction history cleared")?;
        }
        HistoryCommand::Prune { max_entries } => {
            let removed = store.prune(max_entries);
            writeln!(out, "Removed {removed} predictions")?;
        }
        HistoryCommand::Count => writeln!(out, "{}", store.count())?,
    }
    Ok(())
}
