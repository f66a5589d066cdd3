//! Crop prediction models

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use validator::Validate;

use crate::types::{Coordinates, TimestampMillis};

/// Soil nutrient and acidity readings entered for a prediction
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Validate)]
pub struct SoilParams {
    #[validate(range(min = 4.0, max = 9.0))]
    pub ph: f64,
    /// Nitrogen, kg/ha
    #[serde(rename = "N")]
    #[validate(range(min = 0.0, max = 200.0))]
    pub n: f64,
    /// Phosphorus, kg/ha
    #[serde(rename = "P")]
    #[validate(range(min = 0.0, max = 100.0))]
    pub p: f64,
    /// Potassium, kg/ha
    #[serde(rename = "K")]
    #[validate(range(min = 0.0, max = 100.0))]
    pub k: f64,
}

impl Default for SoilParams {
    fn default() -> Self {
        Self {
            ph: 6.5,
            n: 50.0,
            p: 40.0,
            k: 45.0,
        }
    }
}

/// Seasonal weather inputs for a prediction
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Validate)]
pub struct WeatherParams {
    /// Annual rainfall, mm
    #[validate(range(min = 200.0, max = 2000.0))]
    pub rainfall: f64,
    /// Mean temperature, °C
    #[validate(range(min = 10.0, max = 45.0))]
    pub temperature: f64,
}

impl Default for WeatherParams {
    fn default() -> Self {
        Self {
            rainfall: 800.0,
            temperature: 28.0,
        }
    }
}

/// A completed prediction before it is stored
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewPrediction {
    pub farm_name: String,
    pub farm_coordinates: Coordinates,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub farm_area: Option<f64>,
    pub soil_params: SoilParams,
    pub weather_params: WeatherParams,
    /// Result payload from the prediction backend, kept as-is
    #[serde(default)]
    pub prediction: JsonValue,
}

/// A stored prediction history entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PredictionRecord {
    pub id: String,
    pub timestamp: TimestampMillis,
    pub farm_name: String,
    pub farm_coordinates: Coordinates,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub farm_area: Option<f64>,
    pub soil_params: SoilParams,
    pub weather_params: WeatherParams,
    #[serde(default)]
    pub prediction: JsonValue,
}

impl PredictionRecord {
    pub fn new(id: String, timestamp: TimestampMillis, input: NewPrediction) -> Self {
        Self {
            id,
            timestamp,
            farm_name: input.farm_name,
            farm_coordinates: input.farm_coordinates,
            farm_area: input.farm_area,
            soil_params: input.soil_params,
            weather_params: input.weather_params,
            prediction: input.prediction,
        }
    }

    /// Recommended crop named in the backend payload, if any
    pub fn crop(&self) -> Option<&str> {
        self.prediction
            .get("crop")
            .and_then(JsonValue::as_str)
            .filter(|c| !c.is_empty())
    }

    /// Model confidence in percent; the backend sends either a number or a numeric string
    pub fn confidence(&self) -> Option<f64> {
        match self.prediction.get("confidence")? {
            JsonValue::Number(n) => n.as_f64(),
            JsonValue::String(s) => s.trim().trim_end_matches('%').parse().ok(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(prediction: JsonValue) -> PredictionRecord {
        PredictionRecord::new(
            "pred_1".to_string(),
            1,
            NewPrediction {
                farm_name: "North Field".to_string(),
                farm_coordinates: Coordinates::new(28.6139, 77.2090),
                farm_area: None,
                soil_params: SoilParams::default(),
                weather_params: WeatherParams::default(),
                prediction,
            },
        )
    }

    #[test]
    fn test_json_shape_uses_original_field_names() {
        let value = serde_json::to_value(record(json!({"crop": "Rice"}))).unwrap();
        assert_eq!(value["farmName"], "North Field");
        assert_eq!(value["soilParams"]["N"], 50.0);
        assert_eq!(value["weatherParams"]["rainfall"], 800.0);
        assert!(value.get("farmArea").is_none());
    }

    #[test]
    fn test_confidence_accepts_number_or_string() {
        assert_eq!(record(json!({"confidence": 91.5})).confidence(), Some(91.5));
        assert_eq!(record(json!({"confidence": "87.2%"})).confidence(), Some(87.2));
        assert_eq!(record(json!({"confidence": true})).confidence(), None);
        assert_eq!(record(JsonValue::Null).confidence(), None);
    }

    #[test]
    fn test_crop_ignores_empty_name() {
        assert_eq!(record(json!({"crop": "Wheat"})).crop(), Some("Wheat"));
        assert_eq!(record(json!({"crop": ""})).crop(), None);
    }
}
