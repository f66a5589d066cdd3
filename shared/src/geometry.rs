//! Farm boundary geometry
//!
//! Area is estimated with the spherical excess approximation used for small
//! polygons traced on a map. Self-intersecting polygons are not detected; their
//! result is approximate and should not be relied on.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::Coordinates;

/// Earth's mean radius in meters
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Square meters per acre
pub const SQ_METERS_PER_ACRE: f64 = 4046.86;

/// Square feet per acre
pub const SQ_FEET_PER_ACRE: f64 = 43_560.0;

/// Minimum number of points for a closed polygon
pub const MIN_BOUNDARY_POINTS: usize = 3;

#[derive(Debug, Error, PartialEq)]
pub enum GeometryError {
    #[error("Boundary needs at least {MIN_BOUNDARY_POINTS} points, got {0}")]
    TooFewPoints(usize),

    #[error("Boundary point {index} is out of range: {point}")]
    InvalidPoint { index: usize, point: Coordinates },
}

/// Approximate area enclosed by `points` in square meters.
///
/// Fewer than three points enclose nothing and yield zero. Traversal direction
/// does not matter.
pub fn polygon_area_sq_meters(points: &[Coordinates]) -> f64 {
    if points.len() < MIN_BOUNDARY_POINTS {
        return 0.0;
    }

    let sum: f64 = points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(p1, p2)| {
            let lat1 = p1.lat.to_radians();
            let lat2 = p2.lat.to_radians();
            let dlng = (p2.lng - p1.lng).to_radians();
            dlng * (2.0 + lat1.sin() + lat2.sin())
        })
        .sum();

    sum.abs() * EARTH_RADIUS_METERS * EARTH_RADIUS_METERS / 2.0
}

/// Approximate area enclosed by `points` in acres
pub fn polygon_area_acres(points: &[Coordinates]) -> f64 {
    polygon_area_sq_meters(points) / SQ_METERS_PER_ACRE
}

/// Format an acreage for display.
///
/// Below 0.1 acre the value is shown in square feet, below 1 acre with two
/// decimals, otherwise with one.
pub fn format_area(acres: f64) -> String {
    if acres < 0.1 {
        format!("{:.0} sq ft", acres * SQ_FEET_PER_ACRE)
    } else if acres < 1.0 {
        format!("{:.2} acres", acres)
    } else {
        format!("{:.1} acres", acres)
    }
}

/// Ordered points tracing a farm's polygon extent
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "Vec<Coordinates>", into = "Vec<Coordinates>")]
pub struct Boundary {
    points: Vec<Coordinates>,
}

impl Boundary {
    /// Build a boundary, rejecting short or out-of-range point lists
    pub fn new(points: Vec<Coordinates>) -> Result<Self, GeometryError> {
        if points.len() < MIN_BOUNDARY_POINTS {
            return Err(GeometryError::TooFewPoints(points.len()));
        }
        if let Some((index, point)) = points.iter().enumerate().find(|(_, p)| !p.is_valid()) {
            return Err(GeometryError::InvalidPoint {
                index,
                point: *point,
            });
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[Coordinates] {
        &self.points
    }

    pub fn area_sq_meters(&self) -> f64 {
        polygon_area_sq_meters(&self.points)
    }

    pub fn area_acres(&self) -> f64 {
        polygon_area_acres(&self.points)
    }

    /// Arithmetic mean of the vertices, used as the farm's map marker
    pub fn center(&self) -> Coordinates {
        let n = self.points.len().max(1) as f64;
        let (lat, lng) = self
            .points
            .iter()
            .fold((0.0, 0.0), |(lat, lng), p| (lat + p.lat, lng + p.lng));
        Coordinates::new(lat / n, lng / n)
    }
}

impl TryFrom<Vec<Coordinates>> for Boundary {
    type Error = GeometryError;

    fn try_from(points: Vec<Coordinates>) -> Result<Self, Self::Error> {
        Boundary::new(points)
    }
}

impl From<Boundary> for Vec<Coordinates> {
    fn from(boundary: Boundary) -> Self {
        boundary.points
    }
}
