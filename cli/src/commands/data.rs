//! `geocrop export` and `geocrop import`

use std::fs;
use std::io::Write;
use std::path::Path;

use shared::export::DataExport;
use shared::storage::KeyValueStorage;
use tracing::info;

use crate::error::CliResult;

pub fn export<S: KeyValueStorage, W: Write>(
    storage: &S,
    output: Option<&Path>,
    out: &mut W,
) -> CliResult<()> {
    let export = DataExport::collect(storage)?;
    let json = export.to_json_pretty()?;

    match output {
        Some(path) => {
            fs::write(path, json)?;
            info!(path = %path.display(), keys = export.entries.len(), "Data exported");
            writeln!(out, "Exported {} keys to {}", export.entries.len(), path.display())?;
        }
        None => writeln!(out, "{json}")?,
    }
    Ok(())
}

pub fn import<S: KeyValueStorage, W: Write>(storage: &S, file: &Path, out: &mut W) -> CliResult<()> {
    let raw = fs::read_to_string(file)?;
    let export: DataExport = serde_json::from_str(&raw)?;
    let restored = export.restore(storage)?;
    writeln!(out, "Restored {restored} keys from export of {}", export.exported_at)?;
    Ok(())
}
