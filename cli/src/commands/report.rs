//! `geocrop report`

use std::fs;
use std::io::Write;

use shared::history::HistoryStore;
use shared::now_millis;
use shared::reports::{confidence_buckets, crop_distribution, to_csv, ReportFilter};
use shared::storage::KeyValueStorage;
use tracing::info;

use crate::cli::ReportArgs;
use crate::config::Config;
use crate::error::CliResult;

impl From<&ReportArgs> for ReportFilter {
    fn from(args: &ReportArgs) -> Self {
        ReportFilter {
            search: args.search.clone(),
            crop: args.crop.clone(),
            farm: args.farm.clone(),
            date_range: args.range,
        }
    }
}

pub fn run<S: KeyValueStorage, W: Write>(
    args: &ReportArgs,
    storage: S,
    config: &Config,
    out: &mut W,
) -> CliResult<()> {
    let records = HistoryStore::with_config(storage, config.history_config()).list();
    let matching = ReportFilter::from(args).apply(&records, now_millis());
    let csv = to_csv(&matching)?;

    let Some(path) = &args.output else {
        write!(out, "{csv}")?;
        return Ok(());
    };

    fs::write(path, csv)?;
    info!(path = %path.display(), rows = matching.len(), "Report written");

    writeln!(out, "{} of {} predictions", matching.len(), records.len())?;
    for crop in crop_distribution(&matching) {
        writeln!(out, "  {:<24}{}", crop.name, crop.value)?;
    }
    let buckets = confidence_buckets(&matching);
    writeln!(
        out,
        "Confidence: {} very high, {} high, {} moderate, {} low",
        buckets.very_high, buckets.high, buckets.moderate, buckets.low
    )?;
    Ok(())
}
