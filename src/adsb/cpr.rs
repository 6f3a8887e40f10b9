//! Global decoding of compact position report pairs.
//!
//! CPR splits the globe into latitude bands, 60 zones for even messages
//! and 59 for odd ones. A single report only fixes the position within
//! its zone; combining one even and one odd report recovers the zone
//! indices and with them an unambiguous position.

use crate::geo::GeoPos;
use crate::units::{self, angle};

const EVEN_LATITUDE_ZONES: f64 = 60.0;
const ODD_LATITUDE_ZONES: f64 = 59.0;
/// Zone widths in turns.
const EVEN_ZONE_WIDTH: f64 = 1.0 / EVEN_LATITUDE_ZONES;
const ODD_ZONE_WIDTH: f64 = 1.0 / ODD_LATITUDE_ZONES;

/// Decodes a pair of even (`x0`, `y0`) and odd (`x1`, `y1`) position
/// reports, all normalized to [0, 1).
///
/// `most_recent` names the parity of the newer report; the result is the
/// position at that report's time. Returns `None` when the aircraft
/// changed latitude band between the two reports or the decoded latitude
/// is out of range.
pub fn decode_position(x0: f64, y0: f64, x1: f64, y1: f64, most_recent: u8) -> Option<GeoPos> {
    assert!(most_recent == 0 || most_recent == 1, "parity must be 0 or 1");

    let zone_number = rint(y0 * ODD_LATITUDE_ZONES - y1 * EVEN_LATITUDE_ZONES);
    let even_zone_index = zone_index(zone_number, 0, EVEN_LATITUDE_ZONES, ODD_LATITUDE_ZONES);
    let odd_zone_index = zone_index(zone_number, 1, EVEN_LATITUDE_ZONES, ODD_LATITUDE_ZONES);
    let latitude_even = EVEN_ZONE_WIDTH * (even_zone_index + y0);
    let latitude_odd = ODD_ZONE_WIDTH * (odd_zone_index + y1);

    // Both latitudes must agree on the longitude zone count; otherwise the
    // aircraft crossed a band between the reports.
    let longitude_zones_even = longitude_zones(latitude_even);
    if longitude_zones_even != longitude_zones(latitude_odd) {
        return None;
    }

    let longitude = if longitude_zones_even == 1.0 {
        // Polar band: a single longitude zone.
        if most_recent == 0 {
            x0
        } else {
            x1
        }
    } else {
        let longitude_zones_odd = longitude_zones_even - 1.0;
        let zone_number = rint(x0 * longitude_zones_odd - x1 * longitude_zones_even);
        let index = zone_index(zone_number, most_recent, longitude_zones_even, longitude_zones_odd);
        if most_recent == 0 {
            (index + x0) / longitude_zones_even
        } else {
            (index + x1) / longitude_zones_odd
        }
    };
    let latitude = if most_recent == 0 {
        latitude_even
    } else {
        latitude_odd
    };

    let latitude_t32 = to_t32(latitude);
    if !GeoPos::is_valid_latitude_t32(latitude_t32) {
        return None;
    }
    Some(GeoPos::new(to_t32(longitude), latitude_t32))
}

/// Wraps a negative zone number into the zone count of the requested
/// parity.
fn zone_index(zone_number: f64, parity: u8, even_zones: f64, odd_zones: f64) -> f64 {
    if zone_number < 0.0 {
        zone_number + if parity == 0 { even_zones } else { odd_zones }
    } else {
        zone_number
    }
}

/// Number of longitude zones in the latitude band of `latitude` (turns).
fn longitude_zones(latitude: f64) -> f64 {
    let a = f64::acos(
        1.0 - (1.0 - f64::cos(angle::TURN * EVEN_ZONE_WIDTH))
            / f64::cos(units::convert_from(latitude, angle::TURN)).powi(2),
    );
    if a.is_nan() {
        1.0
    } else {
        (angle::TURN / a).floor()
    }
}

/// Recenters a turn fraction into [-0.5, 0.5) and rounds it to T32.
fn to_t32(turns: f64) -> i32 {
    let recentered = if turns >= 0.5 { turns - 1.0 } else { turns };
    rint(units::convert(recentered, angle::TURN, angle::T32)) as i32
}

/// Round half to even, matching IEEE `roundTiesToEven`.
fn rint(value: f64) -> f64 {
    value.round_ties_even()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units;
    use approx::assert_relative_eq;

    const CPR_SCALE: f64 = 131_072.0;

    fn degrees(t32: i32) -> f64 {
        units::convert(f64::from(t32), angle::T32, angle::DEGREE)
    }

    #[test]
    fn test_decode_canonical_pair_even_most_recent() {
        let position = decode_position(
            51372.0 / CPR_SCALE,
            93000.0 / CPR_SCALE,
            50194.0 / CPR_SCALE,
            74158.0 / CPR_SCALE,
            0,
        )
        .expect("pair did not decode");
        assert_relative_eq!(degrees(position.latitude_t32()), 52.257202, epsilon = 1e-5);
        assert_relative_eq!(degrees(position.longitude_t32()), 3.919373, epsilon = 1e-5);
    }

    #[test]
    fn test_decode_canonical_pair_odd_most_recent() {
        let position = decode_position(
            51372.0 / CPR_SCALE,
            93000.0 / CPR_SCALE,
            50194.0 / CPR_SCALE,
            74158.0 / CPR_SCALE,
            1,
        )
        .expect("pair did not decode");
        assert_relative_eq!(degrees(position.latitude_t32()), 52.265780, epsilon = 1e-5);
        assert_relative_eq!(degrees(position.longitude_t32()), 3.938913, epsilon = 1e-5);
    }

    #[test]
    fn test_decode_with_half_coordinates() {
        // All coordinates at exactly one half exercise the tie-to-even
        // rounding of both zone numbers.
        let position = decode_position(0.5, 0.5, 0.5, 0.5, 0).expect("pair did not decode");
        assert_relative_eq!(degrees(position.latitude_t32()), 3.0, epsilon = 1e-6);
        assert_relative_eq!(degrees(position.longitude_t32()), 3.050847, epsilon = 1e-5);
    }

    #[test]
    fn test_latitude_band_change_yields_none() {
        // Even latitude just below the 59-zone boundary, odd just above.
        assert!(decode_position(0.0, 0.74167, 0.0, 0.71919, 0).is_none());
    }

    #[test]
    fn test_out_of_range_latitude_yields_none() {
        // Zone number 20 puts the even latitude at 122 degrees.
        assert!(decode_position(0.0, 20.0 / 59.0, 0.0, 0.0, 0).is_none());
    }
}
