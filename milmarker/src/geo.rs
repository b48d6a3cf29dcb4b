//! Geographic primitives shared by markers and animators.
//!
//! Positions are plain latitude/longitude pairs in degrees. Headings are
//! degrees clockwise from true north in the range `[0, 360)`.

use serde::{Deserialize, Serialize};

/// Smallest cosine used when correcting longitude spans for latitude.
///
/// Keeps the correction finite for orbits placed right at a pole.
const MIN_MERIDIAN_COS: f64 = 1e-6;

/// A geographic position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    /// Latitude in degrees (positive north).
    pub lat: f64,
    /// Longitude in degrees (positive east).
    pub lng: f64,
}

impl LatLng {
    /// Create a new position.
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Whether both components are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

impl From<[f64; 2]> for LatLng {
    fn from([lat, lng]: [f64; 2]) -> Self {
        Self { lat, lng }
    }
}

impl From<(f64, f64)> for LatLng {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self { lat, lng }
    }
}

impl std::fmt::Display for LatLng {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.6}, {:.6}", self.lat, self.lng)
    }
}

/// Normalize a heading to the `[0, 360)` range.
pub fn normalize_heading(degrees: f64) -> f64 {
    let normalized = ((degrees % 360.0) + 360.0) % 360.0;
    // -0.0 and values that round up to exactly 360.0
    if normalized >= 360.0 || normalized == 0.0 {
        0.0
    } else {
        normalized
    }
}

/// Absolute angular distance between two headings.
///
/// Handles wraparound (350° to 10° is 20°, not 340°).
pub fn heading_difference(a: f64, b: f64) -> f64 {
    let diff = (normalize_heading(a) - normalize_heading(b)).abs();
    if diff > 180.0 {
        360.0 - diff
    } else {
        diff
    }
}

/// Signed shortest rotation from `from` to `to`, in `(-180, 180]`.
///
/// Positive values are clockwise.
pub fn signed_heading_delta(from: f64, to: f64) -> f64 {
    let delta = normalize_heading(to - from);
    if delta > 180.0 {
        delta - 360.0
    } else {
        delta
    }
}

/// Longitude span that covers the same ground distance as `radius_lat`
/// degrees of latitude at `at_lat` degrees.
///
/// Meridians converge towards the poles, so a circle drawn with equal
/// latitude and longitude radii reads as a squashed ellipse on the map.
pub fn longitude_radius(radius_lat: f64, at_lat: f64) -> f64 {
    radius_lat / at_lat.to_radians().cos().abs().max(MIN_MERIDIAN_COS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_heading() {
        assert!((normalize_heading(0.0) - 0.0).abs() < 1e-9);
        assert!((normalize_heading(360.0) - 0.0).abs() < 1e-9);
        assert!((normalize_heading(-90.0) - 270.0).abs() < 1e-9);
        assert!((normalize_heading(450.0) - 90.0).abs() < 1e-9);
        assert!((normalize_heading(-450.0) - 270.0).abs() < 1e-9);
        assert_eq!(normalize_heading(-0.0), 0.0);
        assert_eq!(normalize_heading(-1e-17), 0.0);
    }

    #[test]
    fn test_heading_difference_wraps() {
        assert!((heading_difference(90.0, 80.0) - 10.0).abs() < 1e-9);
        assert!((heading_difference(350.0, 10.0) - 20.0).abs() < 1e-9);
        assert!((heading_difference(10.0, 350.0) - 20.0).abs() < 1e-9);
        assert!((heading_difference(0.0, 180.0) - 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_signed_heading_delta() {
        assert!((signed_heading_delta(350.0, 10.0) - 20.0).abs() < 1e-9);
        assert!((signed_heading_delta(10.0, 350.0) + 20.0).abs() < 1e-9);
        assert!((signed_heading_delta(0.0, 180.0) - 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_longitude_radius_equator_and_london() {
        assert!((longitude_radius(0.01, 0.0) - 0.01).abs() < 1e-12);

        // cos(51.5°) ≈ 0.6225
        let r = longitude_radius(0.01, 51.5);
        assert!((r - 0.01 / 0.6225).abs() < 1e-4);
    }

    #[test]
    fn test_longitude_radius_pole_is_finite() {
        assert!(longitude_radius(0.01, 90.0).is_finite());
    }

    #[test]
    fn test_lat_lng_conversions() {
        assert_eq!(LatLng::from([51.505, -0.09]), LatLng::new(51.505, -0.09));
        assert_eq!(LatLng::from((1.0, 2.0)), LatLng::new(1.0, 2.0));
        assert!(!LatLng::new(f64::NAN, 0.0).is_finite());
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_normalized_heading_in_range(deg in -1.0e6..1.0e6_f64) {
                let h = normalize_heading(deg);
                prop_assert!((0.0..360.0).contains(&h), "{} -> {}", deg, h);
            }

            #[test]
            fn test_heading_difference_bounded(a in -720.0..720.0_f64, b in -720.0..720.0_f64) {
                let d = heading_difference(a, b);
                prop_assert!((0.0..=180.0).contains(&d));
                prop_assert!((d - heading_difference(b, a)).abs() < 1e-9);
            }
        }
    }
}
