//! Geographic positions and the Web Mercator projection.

use std::fmt;

use crate::units::{self, angle};

const LATITUDE_T32_MIN: i32 = -(1 << 30);
const LATITUDE_T32_MAX: i32 = 1 << 30;

/// A geographic position as a pair of T32 angles (one turn = 2³² ticks).
///
/// Longitude covers the full i32 range; latitude is restricted to
/// `[-2³⁰, 2³⁰]`, i.e. ±90°.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct GeoPos {
    longitude_t32: i32,
    latitude_t32: i32,
}

impl GeoPos {
    /// Builds a position from T32 coordinates. Panics on an out-of-range
    /// latitude; callers validate with [`GeoPos::is_valid_latitude_t32`]
    /// when the coordinates come from data rather than code.
    pub fn new(longitude_t32: i32, latitude_t32: i32) -> Self {
        assert!(
            Self::is_valid_latitude_t32(latitude_t32),
            "latitude out of range: {latitude_t32}"
        );
        Self {
            longitude_t32,
            latitude_t32,
        }
    }

    /// Whether `latitude_t32` lies within ±90°.
    pub fn is_valid_latitude_t32(latitude_t32: i32) -> bool {
        (LATITUDE_T32_MIN..=LATITUDE_T32_MAX).contains(&latitude_t32)
    }

    pub fn longitude_t32(&self) -> i32 {
        self.longitude_t32
    }

    pub fn latitude_t32(&self) -> i32 {
        self.latitude_t32
    }

    /// Longitude in radians.
    pub fn longitude(&self) -> f64 {
        units::convert(f64::from(self.longitude_t32), angle::T32, angle::RADIAN)
    }

    /// Latitude in radians.
    pub fn latitude(&self) -> f64 {
        units::convert(f64::from(self.latitude_t32), angle::T32, angle::RADIAN)
    }
}

impl fmt::Display for GeoPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({:.5}°, {:.5}°)",
            units::convert(f64::from(self.longitude_t32), angle::T32, angle::DEGREE),
            units::convert(f64::from(self.latitude_t32), angle::T32, angle::DEGREE),
        )
    }
}

impl fmt::Debug for GeoPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// Web Mercator projection, as used by slippy-map tile servers.
///
/// At zoom level `z` the world maps onto a square of 2⁸⁺ᶻ pixels.
pub mod mercator {
    use crate::units::{self, angle};

    fn map_size(zoom: u32) -> f64 {
        f64::powi(2.0, 8 + zoom as i32)
    }

    /// Projected x coordinate for a longitude in radians.
    pub fn x(zoom: u32, longitude: f64) -> f64 {
        map_size(zoom) * (units::convert_to(longitude, angle::TURN) + 0.5)
    }

    /// Projected y coordinate for a latitude in radians.
    pub fn y(zoom: u32, latitude: f64) -> f64 {
        map_size(zoom) * (-units::convert_to(latitude.tan().asinh(), angle::TURN) + 0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_latitude_validity_bounds() {
        assert!(GeoPos::is_valid_latitude_t32(0));
        assert!(GeoPos::is_valid_latitude_t32(1 << 30));
        assert!(GeoPos::is_valid_latitude_t32(-(1 << 30)));
        assert!(!GeoPos::is_valid_latitude_t32((1 << 30) + 1));
        assert!(!GeoPos::is_valid_latitude_t32(-(1 << 30) - 1));
    }

    #[test]
    fn test_quarter_turn_is_ninety_degrees() {
        let pos = GeoPos::new(1 << 30, 1 << 30);
        assert_relative_eq!(pos.latitude(), std::f64::consts::FRAC_PI_2);
        assert_relative_eq!(pos.longitude(), std::f64::consts::FRAC_PI_2);
    }

    #[test]
    fn test_display_in_degrees() {
        let pos = GeoPos::new(0, 1 << 30);
        assert_eq!(pos.to_string(), "(0.00000°, 90.00000°)");
    }

    #[test]
    fn test_mercator_origin_at_zoom_zero() {
        assert_relative_eq!(mercator::x(0, 0.0), 128.0);
        assert_relative_eq!(mercator::y(0, 0.0), 128.0);
    }

    #[test]
    fn test_mercator_scales_with_zoom() {
        assert_relative_eq!(mercator::x(3, 0.0), 1024.0);
        assert_relative_eq!(mercator::x(0, std::f64::consts::PI), 256.0, epsilon = 1e-9);
    }
}
