//! WebAssembly module for the GeoCrop web client
//!
//! Exposes the shared data core to JavaScript:
//! - Farm boundary area estimation
//! - Prediction history, farm registry and weather alerts over `localStorage`
//! - Soil health scoring
//! - Data export and CSV reports
//!
//! Every export takes and returns JSON strings. Errors surface as string
//! `JsValue`s and are echoed to the browser console.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use shared::alerts::AlertStore;
use shared::export::DataExport;
use shared::farms::FarmStore;
use shared::history::HistoryStore;
use shared::reports::{self, ReportFilter};
use shared::storage::KeyValueStorage;
use shared::{geometry, soil, Coordinates, NewFarm, NewPrediction, SoilParams, WeatherReading};

mod storage;

pub use storage::LocalStorage;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    web_sys::console::debug_1(&JsValue::from_str("GeoCrop WASM module loaded"));
}

fn js_error(message: String) -> JsValue {
    let value = JsValue::from_str(&message);
    web_sys::console::error_1(&value);
    value
}

fn open_storage() -> Result<LocalStorage, JsValue> {
    LocalStorage::open().map_err(|e| js_error(e.to_string()))
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("Failed to serialize result: {}", e))
}

// ============================================================================
// Geometry
// ============================================================================

/// Area in acres of a boundary given as `[{lat, lng}, ...]`
#[wasm_bindgen]
pub fn polygon_area_acres(points_json: &str) -> Result<f64, JsValue> {
    area_from_json(points_json).map_err(js_error)
}

/// Human-readable area label ("2.5 acres", "3200 sq ft", ...)
#[wasm_bindgen]
pub fn format_area(acres: f64) -> String {
    geometry::format_area(acres)
}

fn area_from_json(points_json: &str) -> Result<f64, String> {
    let points: Vec<Coordinates> = serde_json::from_str(points_json)
        .map_err(|e| format!("Invalid boundary JSON: {}", e))?;
    Ok(geometry::polygon_area_acres(&points))
}

// ============================================================================
// Prediction History
// ============================================================================

#[wasm_bindgen]
pub fn save_prediction(prediction_json: &str) -> Result<String, JsValue> {
    save_prediction_in(&open_storage()?, prediction_json).map_err(js_error)
}

/// Saved predictions, newest first
#[wasm_bindgen]
pub fn list_predictions() -> Result<String, JsValue> {
    to_json(&HistoryStore::new(open_storage()?).list()).map_err(js_error)
}

#[wasm_bindgen]
pub fn get_prediction(id: &str) -> Result<Option<String>, JsValue> {
    HistoryStore::new(open_storage()?)
        .get_by_id(id)
        .map(|record| to_json(&record))
        .transpose()
        .map_err(js_error)
}

#[wasm_bindgen]
pub fn delete_prediction(id: &str) -> Result<bool, JsValue> {
    Ok(HistoryStore::new(open_storage()?).delete_by_id(id))
}

#[wasm_bindgen]
pub fn clear_history() -> Result<(), JsValue> {
    HistoryStore::new(open_storage()?).clear();
    Ok(())
}

/// Keep only the newest `max_entries` predictions; returns how many were removed
#[wasm_bindgen]
pub fn prune_history(max_entries: u32) -> Result<u32, JsValue> {
    let removed = HistoryStore::new(open_storage()?).prune(max_entries as usize);
    Ok(removed as u32)
}

#[wasm_bindgen]
pub fn history_count() -> Result<u32, JsValue> {
    Ok(HistoryStore::new(open_storage()?).count() as u32)
}

fn save_prediction_in<S: KeyValueStorage>(storage: S, prediction_json: &str) -> Result<String, String> {
    let prediction: NewPrediction = serde_json::from_str(prediction_json)
        .map_err(|e| format!("Invalid prediction JSON: {}", e))?;
    shared::validate_prediction_input(&prediction.soil_params, &prediction.weather_params)
        .map_err(|e| format!("Invalid prediction input: {}", e))?;
    to_json(&HistoryStore::new(storage).save(prediction))
}

// ============================================================================
// Farms
// ============================================================================

#[wasm_bindgen]
pub fn list_farms() -> Result<String, JsValue> {
    to_json(&FarmStore::new(open_storage()?).list()).map_err(js_error)
}

#[wasm_bindgen]
pub fn add_farm(farm_json: &str) -> Result<String, JsValue> {
    add_farm_in(&open_storage()?, farm_json).map_err(js_error)
}

/// Farm ids are epoch milliseconds, passed as JS numbers
#[wasm_bindgen]
pub fn remove_farm(id: f64) -> Result<bool, JsValue> {
    FarmStore::new(open_storage()?)
        .remove(id as i64)
        .map_err(|e| js_error(e.to_string()))
}

fn add_farm_in<S: KeyValueStorage>(storage: S, farm_json: &str) -> Result<String, String> {
    let input: NewFarm =
        serde_json::from_str(farm_json).map_err(|e| format!("Invalid farm JSON: {}", e))?;
    let farm = FarmStore::new(storage)
        .add(input)
        .map_err(|e| e.to_string())?;
    to_json(&farm)
}

// ============================================================================
// Weather Alerts
// ============================================================================

/// Check a weather reading, file any alerts and return the new ones
#[wasm_bindgen]
pub fn check_weather(reading_json: &str) -> Result<String, JsValue> {
    check_weather_in(&open_storage()?, reading_json).map_err(js_error)
}

fn check_weather_in<S: KeyValueStorage>(storage: S, reading_json: &str) -> Result<String, String> {
    let reading: WeatherReading = serde_json::from_str(reading_json)
        .map_err(|e| format!("Invalid weather JSON: {}", e))?;
    let alerts = AlertStore::new(storage)
        .record(&reading)
        .map_err(|e| e.to_string())?;
    to_json(&alerts)
}

// ============================================================================
// Soil, Export and Reports
// ============================================================================

#[wasm_bindgen]
pub fn soil_health(soil_json: &str) -> Result<String, JsValue> {
    soil_health_from_json(soil_json).map_err(js_error)
}

fn soil_health_from_json(soil_json: &str) -> Result<String, String> {
    let params: SoilParams =
        serde_json::from_str(soil_json).map_err(|e| format!("Invalid soil JSON: {}", e))?;
    to_json(&soil::assess(&params))
}

/// Snapshot of every stored GeoCrop key as pretty-printed JSON
#[wasm_bindgen]
pub fn export_data() -> Result<String, JsValue> {
    DataExport::collect(&open_storage()?)
        .map_err(|e| e.to_string())
        .and_then(|export| export.to_json_pretty().map_err(|e| e.to_string()))
        .map_err(js_error)
}

/// CSV of the saved predictions matching `filter_json` (empty for no filter)
#[wasm_bindgen]
pub fn export_report_csv(filter_json: &str) -> Result<String, JsValue> {
    report_csv_in(&open_storage()?, filter_json, shared::now_millis()).map_err(js_error)
}

fn report_csv_in<S: KeyValueStorage>(
    storage: S,
    filter_json: &str,
    now: shared::TimestampMillis,
) -> Result<String, String> {
    let filter: ReportFilter = if filter_json.trim().is_empty() {
        ReportFilter::default()
    } else {
        serde_json::from_str(filter_json).map_err(|e| format!("Invalid filter JSON: {}", e))?
    };
    let records = filter.apply(&HistoryStore::new(storage).list(), now);
    reports::to_csv(&records).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::storage::MemoryStorage;

    const PREDICTION: &str = r#"{
        "farmName": "North Field",
        "farmCoordinates": {"lat": 28.6139, "lng": 77.209},
        "soilParams": {"ph": 6.5, "N": 50, "P": 40, "K": 45},
        "weatherParams": {"rainfall": 800, "temperature": 28},
        "prediction": {"crop": "Wheat", "confidence": 91}
    }"#;

    #[test]
    fn test_area_from_json() {
        assert_eq!(area_from_json("[]").unwrap(), 0.0);
        assert!(area_from_json("not json").is_err());

        let square = r#"[{"lat":0,"lng":0},{"lat":0,"lng":0.01},{"lat":0.01,"lng":0.01},{"lat":0.01,"lng":0}]"#;
        assert!(area_from_json(square).unwrap() > 300.0);
    }

    #[test]
    fn test_format_area() {
        assert_eq!(format_area(12.34), "12.3 acres");
    }

    #[test]
    fn test_save_prediction_then_report() {
        let storage = MemoryStorage::new();
        let saved = save_prediction_in(&storage, PREDICTION).unwrap();
        assert!(saved.contains("\"farmName\":\"North Field\""));

        let csv = report_csv_in(&storage, "", shared::now_millis()).unwrap();
        assert_eq!(csv.lines().count(), 2);

        let filtered = report_csv_in(&storage, r#"{"crop":"Rice"}"#, shared::now_millis()).unwrap();
        assert_eq!(filtered.lines().count(), 1);
    }

    #[test]
    fn test_save_prediction_rejects_out_of_range_input() {
        let storage = MemoryStorage::new();
        let bad = PREDICTION.replace("\"ph\": 6.5", "\"ph\": 12");
        assert!(save_prediction_in(&storage, &bad).is_err());
        assert_eq!(HistoryStore::new(&storage).count(), 0);
    }

    #[test]
    fn test_add_farm_validates() {
        let storage = MemoryStorage::new();
        let ok = add_farm_in(&storage, r#"{"name":"River Plot","coordinates":{"lat":19.07,"lng":72.87}}"#);
        assert!(ok.unwrap().contains("\"area\":\"0 acres\""));

        let bad = add_farm_in(&storage, r#"{"name":"","coordinates":{"lat":19.07,"lng":72.87}}"#);
        assert!(bad.is_err());

        let single_point = add_farm_in(
            &storage,
            r#"{"name":"Pond Plot","coordinates":{"lat":19.07,"lng":72.87},"boundary":[{"lat":19.07,"lng":72.87}]}"#,
        );
        assert!(single_point.unwrap_err().contains("at least 3"));
        assert_eq!(FarmStore::new(&storage).list().len(), 1);
    }

    #[test]
    fn test_check_weather_and_soil_health() {
        let storage = MemoryStorage::new();
        let alerts = check_weather_in(&storage, r#"{"windSpeed": 60}"#).unwrap();
        assert!(alerts.contains("\"type\":\"wind\""));

        let health = soil_health_from_json(r#"{"ph": 6.5, "N": 60, "P": 40, "K": 40}"#).unwrap();
        assert!(health.contains("\"overallScore\":100"));
    }
}
