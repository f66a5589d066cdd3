//! Validation utilities for GeoCrop inputs
//!
//! Field ranges mirror the limits of the prediction form. Records read back
//! from storage are never re-validated.

use validator::{Validate, ValidationError, ValidationErrors};

use crate::models::{SoilParams, WeatherParams};
use crate::types::Coordinates;

/// Coordinates must be finite and inside the lat/lng ranges
pub fn validate_coordinates(coordinates: &Coordinates) -> Result<(), ValidationError> {
    if coordinates.is_valid() {
        Ok(())
    } else {
        let mut error = ValidationError::new("coordinates_out_of_range");
        error.message = Some("Latitude must be within ±90 and longitude within ±180".into());
        Err(error)
    }
}

/// Validate the soil and weather inputs of a prediction request.
///
/// Errors from both parameter groups are merged into one set.
pub fn validate_prediction_input(
    soil: &SoilParams,
    weather: &WeatherParams,
) -> Result<(), ValidationErrors> {
    let soil_result = soil.validate();
    let weather_result = weather.validate();
    match (soil_result, weather_result) {
        (Ok(()), Ok(())) => Ok(()),
        (Err(errors), Ok(())) | (Ok(()), Err(errors)) => Err(errors),
        (Err(mut soil_errors), Err(weather_errors)) => {
            for (field, errors) in weather_errors.field_errors() {
                for error in errors {
                    soil_errors.add(field, error.clone());
                }
            }
            Err(soil_errors)
        }
    }
}

/// Validate a farm display name (trimmed, 1 to 100 characters)
pub fn validate_farm_name(name: &str) -> Result<(), &'static str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Please enter a farm name");
    }
    if trimmed.chars().count() > 100 {
        return Err("Farm name must be at most 100 characters");
    }
    Ok(())
}

/// [`validate_farm_name`] in the form expected by `#[validate(custom)]`
pub fn validate_farm_display_name(name: &str) -> Result<(), ValidationError> {
    validate_farm_name(name).map_err(|message| {
        let mut error = ValidationError::new("farm_name");
        error.message = Some(message.into());
        error
    })
}
