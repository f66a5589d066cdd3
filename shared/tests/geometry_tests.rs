//! Farm boundary area tests
//!
//! Property tests for the spherical excess area estimate: degenerate inputs,
//! rotation and reversal invariance, and a known-size sanity check.

use proptest::prelude::*;
use shared::geometry::{
    format_area, polygon_area_acres, polygon_area_sq_meters, Boundary, EARTH_RADIUS_METERS,
};
use shared::Coordinates;

/// A convex polygon around a center, vertices in counter-clockwise order
fn regular_polygon(center: Coordinates, radius_deg: f64, sides: usize) -> Vec<Coordinates> {
    (0..sides)
        .map(|i| {
            let angle = std::f64::consts::TAU * i as f64 / sides as f64;
            Coordinates::new(
                center.lat + radius_deg * angle.sin(),
                center.lng + radius_deg * angle.cos(),
            )
        })
        .collect()
}

fn relative_diff(a: f64, b: f64) -> f64 {
    if a == 0.0 && b == 0.0 {
        0.0
    } else {
        (a - b).abs() / a.abs().max(b.abs())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_one_hectare_is_about_two_and_a_half_acres() {
        let side = (100.0 / EARTH_RADIUS_METERS).to_degrees();
        let square = vec![
            Coordinates::new(0.0, 0.0),
            Coordinates::new(0.0, side),
            Coordinates::new(side, side),
            Coordinates::new(side, 0.0),
        ];
        let acres = polygon_area_acres(&square);
        assert!(relative_diff(acres, 2.47) < 0.03, "got {acres}");
        assert_eq!(format_area(acres), "2.5 acres");
    }

    #[test]
    fn test_small_plot_formats_in_square_feet() {
        // A 15 m square is well under 0.1 acre
        let side = (15.0 / EARTH_RADIUS_METERS).to_degrees();
        let plot = vec![
            Coordinates::new(18.52, 73.85),
            Coordinates::new(18.52, 73.85 + side),
            Coordinates::new(18.52 + side, 73.85 + side),
            Coordinates::new(18.52 + side, 73.85),
        ];
        let formatted = format_area(polygon_area_acres(&plot));
        assert!(formatted.ends_with("sq ft"), "got {formatted}");
    }

    #[test]
    fn test_boundary_matches_free_function() {
        let points = regular_polygon(Coordinates::new(28.61, 77.21), 0.005, 8);
        let boundary = Boundary::new(points.clone()).unwrap();
        assert_eq!(boundary.area_sq_meters(), polygon_area_sq_meters(&points));
        assert_eq!(boundary.points().len(), 8);
    }

    #[test]
    fn test_boundary_serializes_as_point_array() {
        let boundary = Boundary::new(regular_polygon(Coordinates::new(0.0, 0.0), 0.01, 3)).unwrap();
        let value = serde_json::to_value(&boundary).unwrap();
        assert_eq!(value.as_array().map(Vec::len), Some(3));
        assert!(value[0].get("lat").is_some());
    }
}

// ============================================================================
// Property Tests
// ============================================================================

fn point() -> impl Strategy<Value = Coordinates> {
    (-60.0f64..60.0, -170.0f64..170.0).prop_map(|(lat, lng)| Coordinates::new(lat, lng))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Fewer than three points always enclose zero area
    #[test]
    fn property_degenerate_boundaries_are_zero(
        points in proptest::collection::vec(point(), 0..3)
    ) {
        prop_assert_eq!(polygon_area_sq_meters(&points), 0.0);
    }

    /// Starting the traversal at a different vertex does not change the area
    #[test]
    fn property_area_invariant_under_rotation(
        lat in -60.0f64..60.0,
        lng in -170.0f64..170.0,
        radius in 0.001f64..0.5,
        sides in 3usize..12,
        shift in 0usize..12,
    ) {
        let points = regular_polygon(Coordinates::new(lat, lng), radius, sides);
        let mut rotated = points.clone();
        rotated.rotate_left(shift % sides);

        let a = polygon_area_sq_meters(&points);
        let b = polygon_area_sq_meters(&rotated);
        prop_assert!(relative_diff(a, b) < 1e-6, "{} vs {}", a, b);
    }

    /// Clockwise and counter-clockwise traversal give the same magnitude
    #[test]
    fn property_area_invariant_under_reversal(
        lat in -60.0f64..60.0,
        lng in -170.0f64..170.0,
        radius in 0.001f64..0.5,
        sides in 3usize..12,
    ) {
        let points = regular_polygon(Coordinates::new(lat, lng), radius, sides);
        let mut reversed = points.clone();
        reversed.reverse();

        let a = polygon_area_sq_meters(&points);
        let b = polygon_area_sq_meters(&reversed);
        prop_assert!(a > 0.0);
        prop_assert!(relative_diff(a, b) < 1e-6, "{} vs {}", a, b);
    }

    /// Area is never negative, whatever the input
    #[test]
    fn property_area_non_negative(points in proptest::collection::vec(point(), 0..10)) {
        prop_assert!(polygon_area_sq_meters(&points) >= 0.0);
    }
}
