//! Weather alert models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Location label used when a reading carries none
pub const DEFAULT_ALERT_LOCATION: &str = "Your Area";

/// A weather reading checked against alert thresholds.
///
/// Every field is optional; missing readings never trigger an alert.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeatherReading {
    /// °C
    pub temperature: Option<f64>,
    /// Relative humidity, %
    pub humidity: Option<f64>,
    /// mm
    pub rainfall: Option<f64>,
    /// km/h
    pub wind_speed: Option<f64>,
    pub location: Option<String>,
}

/// A generated weather alert
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeatherAlert {
    pub id: String,
    #[serde(rename = "type")]
    pub alert_type: WeatherAlertType,
    pub severity: AlertSeverity,
    pub title: String,
    pub message: String,
    pub location: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub read: bool,
}

/// Categories of weather alerts
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum WeatherAlertType {
    Temperature,
    Humidity,
    Rainfall,
    Wind,
}

/// Alert urgency
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum AlertSeverity {
    Low,
    Medium,
    High,
}

/// Which alert categories the user wants
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct AlertPreferences {
    pub enable_alerts: bool,
    pub temperature_alerts: bool,
    pub humidity_alerts: bool,
    pub rainfall_alerts: bool,
    pub wind_alerts: bool,
}

impl Default for AlertPreferences {
    fn default() -> Self {
        Self {
            enable_alerts: true,
            temperature_alerts: true,
            humidity_alerts: true,
            rainfall_alerts: true,
            wind_alerts: true,
        }
    }
}

impl AlertPreferences {
    pub fn allows(&self, alert_type: WeatherAlertType) -> bool {
        self.enable_alerts
            && match alert_type {
                WeatherAlertType::Temperature => self.temperature_alerts,
                WeatherAlertType::Humidity => self.humidity_alerts,
                WeatherAlertType::Rainfall => self.rainfall_alerts,
                WeatherAlertType::Wind => self.wind_alerts,
            }
    }

    /// Overwrite the flags present in `patch`
    pub fn merge(&mut self, patch: &PreferencesPatch) {
        let fields = [
            (&mut self.enable_alerts, patch.enable_alerts),
            (&mut self.temperature_alerts, patch.temperature_alerts),
            (&mut self.humidity_alerts, patch.humidity_alerts),
            (&mut self.rainfall_alerts, patch.rainfall_alerts),
            (&mut self.wind_alerts, patch.wind_alerts),
        ];
        for (field, value) in fields {
            if let Some(value) = value {
                *field = value;
            }
        }
    }
}

/// Partial preference update
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesPatch {
    pub enable_alerts: Option<bool>,
    pub temperature_alerts: Option<bool>,
    pub humidity_alerts: Option<bool>,
    pub rainfall_alerts: Option<bool>,
    pub wind_alerts: Option<bool>,
}
