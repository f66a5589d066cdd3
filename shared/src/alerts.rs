//! Weather alert generation and the local alert inbox

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::models::{
    AlertPreferences, AlertSeverity, PreferencesPatch, WeatherAlert, WeatherAlertType,
    WeatherReading, DEFAULT_ALERT_LOCATION,
};
use crate::storage::{keys, KeyValueStorage, StorageError};

/// Maximum number of alerts kept in the inbox
pub const MAX_ALERTS: usize = 50;

/// Alert trigger thresholds
pub mod thresholds {
    /// °C, inclusive
    pub const TEMPERATURE_HIGH: f64 = 40.0;
    pub const TEMPERATURE_LOW: f64 = 5.0;
    /// %, inclusive
    pub const HUMIDITY_HIGH: f64 = 90.0;
    pub const HUMIDITY_LOW: f64 = 20.0;
    /// mm, inclusive
    pub const RAINFALL_HEAVY: f64 = 50.0;
    /// km/h, inclusive
    pub const WIND_HIGH: f64 = 40.0;
}

fn new_alert(
    alert_type: WeatherAlertType,
    severity: AlertSeverity,
    title: &str,
    message: String,
    location: &str,
) -> WeatherAlert {
    WeatherAlert {
        id: uuid::Uuid::new_v4().to_string(),
        alert_type,
        severity,
        title: title.to_string(),
        message,
        location: location.to_string(),
        timestamp: Utc::now(),
        read: false,
    }
}

/// Alerts raised by `reading` under the user's preferences
pub fn check_conditions(
    preferences: &AlertPreferences,
    reading: &WeatherReading,
) -> Vec<WeatherAlert> {
    use thresholds::*;

    let mut alerts = Vec::new();
    if !preferences.enable_alerts {
        return alerts;
    }
    let location = reading.location.as_deref().unwrap_or(DEFAULT_ALERT_LOCATION);

    if let (true, Some(t)) = (
        preferences.allows(WeatherAlertType::Temperature),
        reading.temperature,
    ) {
        if t >= TEMPERATURE_HIGH {
            alerts.push(new_alert(
                WeatherAlertType::Temperature,
                AlertSeverity::High,
                "Extreme Heat Warning",
                format!("Temperature is {t}°C. Protect crops from heat stress and ensure adequate irrigation."),
                location,
            ));
        } else if t <= TEMPERATURE_LOW {
            alerts.push(new_alert(
                WeatherAlertType::Temperature,
                AlertSeverity::High,
                "Frost Warning",
                format!("Temperature is {t}°C. Risk of frost damage to crops. Consider protective measures."),
                location,
            ));
        }
    }

    if let (true, Some(h)) = (
        preferences.allows(WeatherAlertType::Humidity),
        reading.humidity,
    ) {
        if h >= HUMIDITY_HIGH {
            alerts.push(new_alert(
                WeatherAlertType::Humidity,
                AlertSeverity::Medium,
                "High Humidity Alert",
                format!("Humidity is {h}%. Increased risk of fungal diseases. Monitor crops closely."),
                location,
            ));
        } else if h <= HUMIDITY_LOW {
            alerts.push(new_alert(
                WeatherAlertType::Humidity,
                AlertSeverity::Medium,
                "Low Humidity Warning",
                format!("Humidity is {h}%. Crops may need additional watering."),
                location,
            ));
        }
    }

    if let (true, Some(r)) = (
        preferences.allows(WeatherAlertType::Rainfall),
        reading.rainfall,
    ) {
        if r >= RAINFALL_HEAVY {
            alerts.push(new_alert(
                WeatherAlertType::Rainfall,
                AlertSeverity::High,
                "Heavy Rainfall Alert",
                format!("Expected rainfall: {r}mm. Check drainage systems and protect sensitive crops."),
                location,
            ));
        }
    }

    if let (true, Some(w)) = (preferences.allows(WeatherAlertType::Wind), reading.wind_speed) {
        if w >= WIND_HIGH {
            alerts.push(new_alert(
                WeatherAlertType::Wind,
                AlertSeverity::Medium,
                "Strong Wind Warning",
                format!("Wind speed: {w} km/h. Secure loose structures and protect tall crops."),
                location,
            ));
        }
    }

    alerts
}

/// Alert inbox and preferences backed by a [`KeyValueStorage`]
pub struct AlertStore<S> {
    storage: S,
}

impl<S: KeyValueStorage> AlertStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn preferences(&self) -> AlertPreferences {
        self.read(keys::ALERT_PREFERENCES).unwrap_or_default()
    }

    /// Apply the flags present in `patch` and return the merged preferences
    pub fn update_preferences(
        &self,
        patch: &PreferencesPatch,
    ) -> Result<AlertPreferences, StorageError> {
        let mut preferences = self.preferences();
        preferences.merge(patch);
        self.write(keys::ALERT_PREFERENCES, &preferences)?;
        Ok(preferences)
    }

    /// Inbox contents, newest first
    pub fn alerts(&self) -> Vec<WeatherAlert> {
        self.read(keys::WEATHER_ALERTS).unwrap_or_default()
    }

    /// Check `reading` and file any resulting alerts; returns the new alerts
    pub fn record(&self, reading: &WeatherReading) -> Result<Vec<WeatherAlert>, StorageError> {
        let new_alerts = check_conditions(&self.preferences(), reading);
        if !new_alerts.is_empty() {
            debug!(count = new_alerts.len(), "Weather alerts raised");
            let mut alerts = new_alerts.clone();
            alerts.extend(self.alerts());
            self.save_alerts(alerts)?;
        }
        Ok(new_alerts)
    }

    /// File a custom alert, stamping it with a fresh id and time
    pub fn add(&self, mut alert: WeatherAlert) -> Result<WeatherAlert, StorageError> {
        alert.id = uuid::Uuid::new_v4().to_string();
        alert.timestamp = Utc::now();
        alert.read = false;

        let mut alerts = vec![alert.clone()];
        alerts.extend(self.alerts());
        self.save_alerts(alerts)?;
        Ok(alert)
    }

    /// Mark one alert read; returns false when no alert has `id`
    pub fn mark_read(&self, id: &str) -> Result<bool, StorageError> {
        let mut alerts = self.alerts();
        let Some(alert) = alerts.iter_mut().find(|a| a.id == id) else {
            return Ok(false);
        };
        alert.read = true;
        self.save_alerts(alerts)?;
        Ok(true)
    }

    pub fn mark_all_read(&self) -> Result<(), StorageError> {
        let mut alerts = self.alerts();
        alerts.iter_mut().for_each(|a| a.read = true);
        self.save_alerts(alerts)
    }

    /// Remove one alert; returns false when no alert has `id`
    pub fn dismiss(&self, id: &str) -> Result<bool, StorageError> {
        let mut alerts = self.alerts();
        let before = alerts.len();
        alerts.retain(|a| a.id != id);
        if alerts.len() == before {
            return Ok(false);
        }
        self.save_alerts(alerts)?;
        Ok(true)
    }

    pub fn clear(&self) -> Result<(), StorageError> {
        self.save_alerts(Vec::new())
    }

    pub fn unread_count(&self) -> usize {
        self.alerts().iter().filter(|a| !a.read).count()
    }

    fn save_alerts(&self, mut alerts: Vec<WeatherAlert>) -> Result<(), StorageError> {
        alerts.truncate(MAX_ALERTS);
        self.write(keys::WEATHER_ALERTS, &alerts)
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.storage.get(key) {
            Ok(raw) => raw?,
            Err(e) => {
                warn!(key, error = %e, "Error reading alert data");
                return None;
            }
        };
        serde_json::from_str(&raw)
            .map_err(|e| warn!(key, error = %e, "Stored alert data is malformed"))
            .ok()
    }

    fn write<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let json = serde_json::to_string(value)
            .map_err(|e| StorageError::Io(format!("Failed to serialize {key}: {e}")))?;
        self.storage.set(key, &json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading() -> WeatherReading {
        WeatherReading {
            temperature: Some(42.0),
            humidity: Some(95.0),
            rainfall: Some(60.0),
            wind_speed: Some(45.0),
            location: Some("Pune".to_string()),
        }
    }

    #[test]
    fn test_all_categories_fire() {
        let alerts = check_conditions(&AlertPreferences::default(), &reading());
        let types: Vec<_> = alerts.iter().map(|a| a.alert_type).collect();
        assert_eq!(
            types,
            vec![
                WeatherAlertType::Temperature,
                WeatherAlertType::Humidity,
                WeatherAlertType::Rainfall,
                WeatherAlertType::Wind,
            ]
        );
        assert!(alerts.iter().all(|a| a.location == "Pune" && !a.read));
    }

    #[test]
    fn test_thresholds_are_inclusive() {
        let at_threshold = WeatherReading {
            temperature: Some(thresholds::TEMPERATURE_LOW),
            humidity: Some(thresholds::HUMIDITY_LOW),
            rainfall: Some(thresholds::RAINFALL_HEAVY),
            wind_speed: Some(thresholds::WIND_HIGH),
            location: None,
        };
        let alerts = check_conditions(&AlertPreferences::default(), &at_threshold);
        assert_eq!(alerts.len(), 4);
        assert_eq!(alerts[0].title, "Frost Warning");
        assert_eq!(alerts[0].location, DEFAULT_ALERT_LOCATION);
    }

    #[test]
    fn test_disabled_preferences_suppress_alerts() {
        let off = AlertPreferences {
            enable_alerts: false,
            ..AlertPreferences::default()
        };
        assert!(check_conditions(&off, &reading()).is_empty());

        let no_wind = AlertPreferences {
            wind_alerts: false,
            ..AlertPreferences::default()
        };
        assert!(check_conditions(&no_wind, &reading())
            .iter()
            .all(|a| a.alert_type != WeatherAlertType::Wind));
    }

    #[test]
    fn test_mild_weather_raises_nothing() {
        let mild = WeatherReading {
            temperature: Some(25.0),
            humidity: Some(60.0),
            rainfall: Some(5.0),
            wind_speed: Some(10.0),
            location: None,
        };
        assert!(check_conditions(&AlertPreferences::default(), &mild).is_empty());
    }
}
