//! Measurement units and conversions.
//!
//! Every unit is expressed as its magnitude in the corresponding base unit
//! (radian, meter, second), so converting is a single multiplication.

/// Converts `value` from `from` to `to`, both expressed in a common base unit.
pub fn convert(value: f64, from: f64, to: f64) -> f64 {
    value * (from / to)
}

/// Converts `value` from `from` to the base unit.
pub fn convert_from(value: f64, from: f64) -> f64 {
    convert(value, from, 1.0)
}

/// Converts `value` from the base unit to `to`.
pub fn convert_to(value: f64, to: f64) -> f64 {
    convert(value, 1.0, to)
}

pub mod angle {
    use std::f64::consts::TAU;

    pub const RADIAN: f64 = 1.0;
    pub const TURN: f64 = TAU;
    pub const DEGREE: f64 = TURN / 360.0;
    /// One T32 tick: a full turn split into 2³² parts.
    pub const T32: f64 = TURN / 4_294_967_296.0;
}

pub mod length {
    pub const METER: f64 = 1.0;
    pub const CENTIMETER: f64 = 1e-2 * METER;
    pub const INCH: f64 = 2.54 * CENTIMETER;
    pub const FOOT: f64 = 12.0 * INCH;
    pub const KILOMETER: f64 = 1e3 * METER;
    pub const NAUTICAL_MILE: f64 = 1852.0 * METER;
}

pub mod time {
    pub const SECOND: f64 = 1.0;
    pub const MINUTE: f64 = 60.0 * SECOND;
    pub const HOUR: f64 = 60.0 * MINUTE;
}

pub mod speed {
    use super::{length, time};

    pub const KNOT: f64 = length::NAUTICAL_MILE / time::HOUR;
    pub const KILOMETER_PER_HOUR: f64 = length::KILOMETER / time::HOUR;
}
