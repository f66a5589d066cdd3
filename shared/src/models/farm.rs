//! Farm models

use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;
use validator::Validate;

use crate::geometry::{format_area, Boundary};
use crate::types::Coordinates;
use crate::validation::{validate_coordinates, validate_farm_display_name};

/// Soil type recorded when the user has not specified one
pub const UNKNOWN_SOIL_TYPE: &str = "Unknown";

/// Area label for farms registered from a single map click
pub const UNMEASURED_AREA: &str = "0 acres";

/// A registered farm plot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Farm {
    /// Creation time in epoch milliseconds, unique within the registry
    pub id: i64,
    pub name: String,
    #[serde(default = "unknown_soil_type")]
    pub soil_type: String,
    pub coordinates: Coordinates,
    /// A stored boundary that fails validation is dropped; the farm is kept
    #[serde(
        default,
        deserialize_with = "lenient_boundary",
        skip_serializing_if = "Option::is_none"
    )]
    pub boundary: Option<Boundary>,
    /// Display string derived from `area_value`
    #[serde(default)]
    pub area: String,
    /// Area in acres, derived from `boundary` when present
    #[serde(default)]
    pub area_value: f64,
}

fn unknown_soil_type() -> String {
    UNKNOWN_SOIL_TYPE.to_string()
}

fn lenient_boundary<'de, D>(deserializer: D) -> Result<Option<Boundary>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(points) = Option::<Vec<Coordinates>>::deserialize(deserializer)? else {
        return Ok(None);
    };
    match Boundary::new(points) {
        Ok(boundary) => Ok(Some(boundary)),
        Err(e) => {
            warn!(error = %e, "Ignoring invalid stored farm boundary");
            Ok(None)
        }
    }
}

impl Farm {
    /// Recompute the derived area fields from the boundary.
    ///
    /// Farms without a boundary keep whatever acreage they were given; a
    /// legacy record holding only a display string keeps that string.
    pub fn refresh_area(&mut self) {
        match &self.boundary {
            Some(boundary) => self.area_value = boundary.area_acres(),
            None if self.area_value <= 0.0 => {
                self.area_value = 0.0;
                if self.area.trim().is_empty() {
                    self.area = UNMEASURED_AREA.to_string();
                }
                return;
            }
            None => {}
        }
        self.area = format_area(self.area_value);
    }

    /// Replace the boundary and recompute the derived area
    pub fn set_boundary(&mut self, boundary: Option<Boundary>) {
        self.boundary = boundary;
        if self.boundary.is_none() {
            self.area_value = 0.0;
            self.area.clear();
        }
        self.refresh_area();
    }
}

/// Input for registering a farm
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewFarm {
    #[validate(custom = "validate_farm_display_name")]
    pub name: String,
    #[serde(default)]
    pub soil_type: Option<String>,
    #[validate(custom = "validate_coordinates")]
    pub coordinates: Coordinates,
    #[serde(default)]
    pub boundary: Option<Boundary>,
}

impl NewFarm {
    pub fn new(name: impl Into<String>, coordinates: Coordinates) -> Self {
        Self {
            name: name.into(),
            soil_type: None,
            coordinates,
            boundary: None,
        }
    }

    pub fn with_soil_type(mut self, soil_type: impl Into<String>) -> Self {
        self.soil_type = Some(soil_type.into());
        self
    }

    pub fn with_boundary(mut self, boundary: Boundary) -> Self {
        self.boundary = Some(boundary);
        self
    }

    /// Build the stored farm under `id`
    pub fn into_farm(self, id: i64) -> Farm {
        let mut farm = Farm {
            id,
            name: self.name.trim().to_string(),
            soil_type: self
                .soil_type
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(unknown_soil_type),
            coordinates: self.coordinates,
            boundary: self.boundary,
            area: String::new(),
            area_value: 0.0,
        };
        farm.refresh_area();
        farm
    }
}
