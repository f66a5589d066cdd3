//! Prediction reports: filtering, summaries, yield estimates and CSV export

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{PredictionRecord, SoilParams, WeatherParams};
use crate::types::TimestampMillis;

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Placeholder for fields missing from a record
pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV output is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),

    #[error("CSV buffer error: {0}")]
    Buffer(String),
}

/// How far back a report looks
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DateRange {
    #[default]
    All,
    Week,
    Month,
    Quarter,
}

impl DateRange {
    /// Window length in milliseconds, `None` for unbounded
    pub fn window_ms(&self) -> Option<i64> {
        match self {
            DateRange::All => None,
            DateRange::Week => Some(7 * DAY_MS),
            DateRange::Month => Some(30 * DAY_MS),
            DateRange::Quarter => Some(90 * DAY_MS),
        }
    }
}

impl std::str::FromStr for DateRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(DateRange::All),
            "week" => Ok(DateRange::Week),
            "month" => Ok(DateRange::Month),
            "quarter" => Ok(DateRange::Quarter),
            other => Err(format!("Unknown date range: {other}")),
        }
    }
}

/// Report filter; unset fields match everything
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportFilter {
    /// Case-insensitive substring of the crop or farm name
    pub search: Option<String>,
    pub crop: Option<String>,
    pub farm: Option<String>,
    pub date_range: DateRange,
}

impl ReportFilter {
    pub fn matches(&self, record: &PredictionRecord, now: TimestampMillis) -> bool {
        if let Some(term) = self.search.as_deref().filter(|t| !t.is_empty()) {
            let term = term.to_lowercase();
            let in_crop = record
                .crop()
                .is_some_and(|c| c.to_lowercase().contains(&term));
            let in_farm = record.farm_name.to_lowercase().contains(&term);
            if !in_crop && !in_farm {
                return false;
            }
        }
        if let Some(crop) = &self.crop {
            if record.crop() != Some(crop.as_str()) {
                return false;
            }
        }
        if let Some(farm) = &self.farm {
            if &record.farm_name != farm {
                return false;
            }
        }
        match self.date_range.window_ms() {
            Some(window) => now.saturating_sub(record.timestamp) <= window,
            None => true,
        }
    }

    /// Records matching the filter, in input order
    pub fn apply(&self, records: &[PredictionRecord], now: TimestampMillis) -> Vec<PredictionRecord> {
        records
            .iter()
            .filter(|r| self.matches(r, now))
            .cloned()
            .collect()
    }
}

/// Number of predictions per recommended crop
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CropCount {
    pub name: String,
    pub value: usize,
}

/// Crop counts, most frequent first; ties keep alphabetical order
pub fn crop_distribution(records: &[PredictionRecord]) -> Vec<CropCount> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for crop in records.iter().filter_map(PredictionRecord::crop) {
        *counts.entry(crop).or_default() += 1;
    }
    let mut distribution: Vec<CropCount> = counts
        .into_iter()
        .map(|(name, value)| CropCount {
            name: name.to_string(),
            value,
        })
        .collect();
    distribution.sort_by(|a, b| b.value.cmp(&a.value));
    distribution
}

/// Confidence histogram
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConfidenceBuckets {
    /// 90-100%
    pub very_high: usize,
    /// 80-89%
    pub high: usize,
    /// 70-79%
    pub moderate: usize,
    /// Below 70%, including records without a confidence value
    pub low: usize,
}

pub fn confidence_buckets(records: &[PredictionRecord]) -> ConfidenceBuckets {
    records
        .iter()
        .fold(ConfidenceBuckets::default(), |mut buckets, record| {
            match record.confidence().unwrap_or(0.0) {
                c if c >= 90.0 => buckets.very_high += 1,
                c if c >= 80.0 => buckets.high += 1,
                c if c >= 70.0 => buckets.moderate += 1,
                _ => buckets.low += 1,
            }
            buckets
        })
}

/// Typical yield in tons per hectare before soil/weather modifiers
fn base_yield(crop: Option<&str>) -> f64 {
    match crop {
        Some("Wheat") => 3.5,
        Some("Rice") => 4.0,
        Some("Maize") => 5.5,
        Some("Cotton") => 1.8,
        Some("Sugarcane") => 70.0,
        Some("Soybean") => 2.0,
        Some("Groundnut") => 1.5,
        Some("Pulses") => 1.2,
        Some("Forest") => 0.0,
        Some("PermanentCrop") => 8.0,
        Some("HerbaceousVegetation") => 2.0,
        Some("AnnualCrop") => 3.0,
        Some("Pasture") => 5.0,
        _ => 2.5,
    }
}

/// Estimated yield in tons per hectare, rounded to two decimals
pub fn estimate_yield(crop: Option<&str>, soil: &SoilParams, weather: &WeatherParams) -> f64 {
    let mut modifier = 1.0;

    if (6.0..=7.5).contains(&soil.ph) {
        modifier *= 1.1;
    } else if soil.ph < 5.5 || soil.ph > 8.0 {
        modifier *= 0.8;
    }

    if (40.0..=80.0).contains(&soil.n) {
        modifier *= 1.15;
    } else if soil.n < 20.0 {
        modifier *= 0.7;
    }

    if (80.0..=150.0).contains(&weather.rainfall) {
        modifier *= 1.1;
    } else if weather.rainfall < 50.0 || weather.rainfall > 200.0 {
        modifier *= 0.85;
    }

    (base_yield(crop) * modifier * 100.0).round() / 100.0
}

/// Display format for record timestamps, e.g. `Mar 04, 2025, 09:15 AM`
pub fn format_timestamp(timestamp: TimestampMillis) -> String {
    DateTime::<Utc>::from_timestamp_millis(timestamp)
        .map(|dt| dt.format("%b %d, %Y, %I:%M %p").to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

pub const CSV_HEADERS: [&str; 11] = [
    "Date",
    "Farm",
    "Crop",
    "Confidence",
    "pH",
    "Nitrogen",
    "Phosphorus",
    "Potassium",
    "Rainfall",
    "Temperature",
    "Estimated Yield",
];

/// Render records as CSV with a header row
pub fn to_csv(records: &[PredictionRecord]) -> Result<String, ReportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADERS)?;

    for record in records {
        let soil = &record.soil_params;
        let weather = &record.weather_params;
        writer.write_record([
            format_timestamp(record.timestamp),
            non_empty(&record.farm_name, "Unknown"),
            record.crop().unwrap_or("Unknown").to_string(),
            record
                .confidence()
                .map(|c| c.to_string())
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            soil.ph.to_string(),
            soil.n.to_string(),
            soil.p.to_string(),
            soil.k.to_string(),
            weather.rainfall.to_string(),
            weather.temperature.to_string(),
            format!("{:.2}", estimate_yield(record.crop(), soil, weather)),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ReportError::Buffer(e.to_string()))?;
    Ok(String::from_utf8(bytes)?)
}

fn non_empty(value: &str, fallback: &str) -> String {
    if value.trim().is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}
