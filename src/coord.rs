//! Coordinate codec: WGS84 degrees <-> the integer lattice every polygon
//! and PIP test operates on (§3, §4.1).

use crate::error::{Axis, InvalidCoordinate};

/// Fixed-point scale factor: 10^7 ticks per degree, giving ~1cm resolution
/// at the equator while fitting comfortably in `i32`.
const SCALE: f64 = 1.0e7;

/// Converts a longitude or latitude in degrees to the integer lattice.
///
/// Total on `[-180, 180]` and `[-90, 90]`; out-of-range values are a caller
/// error checked separately by [`validate`], not by this function (it has
/// no failure mode of its own, matching §4.1's "two pure functions").
#[must_use]
pub fn coord_to_int(d: f64) -> i32 {
    // Comfortably within i32 range for any in-range longitude/latitude:
    // |d| <= 180 => |d * 1e7| <= 1.8e9 < i32::MAX.
    (d * SCALE).round() as i32
}

/// Converts an integer-lattice coordinate back to degrees.
#[must_use]
pub fn int_to_coord(i: i32) -> f64 {
    f64::from(i) / SCALE
}

/// Validates a longitude, in degrees.
///
/// # Errors
///
/// Returns [`InvalidCoordinate`] if `lng` is non-finite or outside
/// `[-180, 180]`.
pub fn validate_lng(lng: f64) -> Result<(), InvalidCoordinate> {
    if lng.is_finite() && (-180.0..=180.0).contains(&lng) {
        Ok(())
    } else {
        Err(InvalidCoordinate::new(lng, Axis::Longitude))
    }
}

/// Validates a latitude, in degrees.
///
/// # Errors
///
/// Returns [`InvalidCoordinate`] if `lat` is non-finite or outside
/// `[-90, 90]`.
pub fn validate_lat(lat: f64) -> Result<(), InvalidCoordinate> {
    if lat.is_finite() && (-90.0..=90.0).contains(&lat) {
        Ok(())
    } else {
        Err(InvalidCoordinate::new(lat, Axis::Latitude))
    }
}

/// A validated `(lng, lat)` pair in degrees, the entry point for every
/// query.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Coordinate {
    lng: f64,
    lat: f64,
}

impl Coordinate {
    /// Validates and wraps a `(lng, lat)` pair in degrees.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidCoordinate`] if either component is out of range;
    /// see [`validate_lng`] and [`validate_lat`].
    pub fn new(lng: f64, lat: f64) -> Result<Self, InvalidCoordinate> {
        validate_lng(lng)?;
        validate_lat(lat)?;
        Ok(Self { lng, lat })
    }

    /// Longitude, in degrees.
    #[must_use]
    pub const fn lng(self) -> f64 {
        self.lng
    }

    /// Latitude, in degrees.
    #[must_use]
    pub const fn lat(self) -> f64 {
        self.lat
    }

    /// Converts to the integer lattice as `(x, y)` = `(lng, lat)` ticks.
    #[must_use]
    pub fn to_lattice(self) -> (i32, i32) {
        (coord_to_int(self.lng), coord_to_int(self.lat))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn round_trip() {
        // For every degree value representable with 7 decimal digits, the
        // round trip through the integer lattice is exact (§8 invariant 1).
        for d in [0.0, 1.0, -1.0, 180.0, -180.0, 90.0, -90.0, 13.3580000, -74.0060000] {
            assert_relative_eq!(int_to_coord(coord_to_int(d)), d, epsilon = 1e-7);
        }
    }

    #[test]
    fn validation_accepts_boundaries() {
        assert!(validate_lng(180.0).is_ok());
        assert!(validate_lng(-180.0).is_ok());
        assert!(validate_lat(90.0).is_ok());
        assert!(validate_lat(-90.0).is_ok());
    }

    #[test]
    fn validation_rejects_out_of_range() {
        assert!(validate_lng(180.01).is_err());
        assert!(validate_lng(-180.01).is_err());
        assert!(validate_lat(90.01).is_err());
        assert!(validate_lat(f64::NAN).is_err());
    }

    #[test]
    fn coordinate_constructor_validates_both_axes() {
        assert!(Coordinate::new(0.0, 0.0).is_ok());
        assert!(Coordinate::new(200.0, 0.0).is_err());
        assert!(Coordinate::new(0.0, 200.0).is_err());
    }

    #[test]
    fn to_lattice_matches_scale_factor() {
        let c = Coordinate::new(13.358, 52.5061).expect("berlin coordinates are in range");
        let (x, y) = c.to_lattice();
        assert_eq!(x, 133_580_000);
        assert_eq!(y, 525_061_000);
    }
}
